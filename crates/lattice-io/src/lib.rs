pub mod errors;
pub mod load;
pub mod save;
pub mod table;

pub use errors::LoadError;
pub use load::{load_config_file, load_lattices, load_lattices_file};
pub use save::{save_lattices, save_lattices_file};
pub use table::{
    clean_header, coerce_cell, load_table_file, parse_table, table_to_presence_maps,
};
