pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    destination_deleted, destination_line, destination_new, destination_updated, dim, empty,
    error, header, muted, section, status, success, warn,
};
pub use table::{destination_detail_table, destinations_table};
pub use theme::{theme, Theme};
