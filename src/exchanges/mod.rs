pub mod bitmex;
