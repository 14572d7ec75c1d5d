pub mod classes;
pub mod demo;
pub mod init;
