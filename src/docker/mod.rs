pub mod dockerfile;
pub mod extensions;
pub mod runner;
