pub mod pages;
pub mod proxy;
