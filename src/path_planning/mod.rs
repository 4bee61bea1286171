// Path planning algorithms module

pub mod a_star;
pub mod catmull_rom;
pub mod refine;

pub use a_star::find_grid_path;
pub use catmull_rom::{catmull_rom, DEFAULT_SAMPLES_PER_SEGMENT};
pub use refine::{refine_path, RefineConfig};
