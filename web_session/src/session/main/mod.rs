mod activation;
mod flash;
mod key;
mod manager;

#[cfg(test)]
pub(crate) mod test_utils;

pub use manager::SessionManager;
