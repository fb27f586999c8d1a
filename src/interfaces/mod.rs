pub mod cli;

#[cfg(test)]
pub mod mock_server;
