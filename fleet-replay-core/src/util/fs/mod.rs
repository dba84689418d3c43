pub mod read_utils;
