pub mod http;
pub mod workflows;

#[cfg(test)]
pub mod testutil;
