pub mod catalog;
pub mod landing;
pub mod layout;
