pub mod ai;
pub mod boss;
pub mod collision;
pub mod item;
pub mod spawner;
