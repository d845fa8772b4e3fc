pub mod d400_directory_summary;
