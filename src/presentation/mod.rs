pub mod impl_display;
pub mod impl_fake;
pub mod interface;
