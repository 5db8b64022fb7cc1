pub mod fields;
pub mod patch;
pub mod work_item;
