pub mod instance;
pub mod network;
