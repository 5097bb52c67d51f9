pub mod cd;
pub mod echo;
pub mod export;
pub mod registry;
pub mod system;
pub mod unset;
pub mod which;
