pub mod format;
pub mod paths;
pub mod terminal;

pub use format::{ellipsize, format_cost, format_count, format_duration, truncate_chars};
pub use paths::{
    collect_transcript_files, default_export_filename, format_path_with_tilde, is_transcript_file,
    read_transcript, safe_open_file, validate_file_size,
};
pub use terminal::{single_line, strip_ansi_codes};
