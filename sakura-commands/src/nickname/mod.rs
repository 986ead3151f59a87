pub mod batchcancel;
pub mod randomname;
pub mod resetall;
pub mod resetname;
pub mod translateall;
pub mod translatename;
pub mod translaterole;
pub mod translatetext;

mod bulk;
pub(crate) mod embeds;
mod members;
