pub mod a001_category;
pub mod a002_product;
pub mod a003_client;
pub mod a004_tool;
pub mod a005_task;
