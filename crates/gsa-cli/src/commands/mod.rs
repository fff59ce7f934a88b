pub mod feed;
pub mod init;
pub mod search;
pub mod serve;
pub mod suggest;
