use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the VOC / YOLO / TFRecord conversion tool.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert Pascal VOC XML annotations to YOLO label files
    ConvertLabels {
        /// Directory containing the VOC XML files
        #[arg(long = "xml_dir")]
        xml_dir: PathBuf,

        /// Output directory for the YOLO label files
        #[arg(long = "label_dir")]
        label_dir: PathBuf,

        /// Ordered list of class names to keep; a label's class index is its
        /// position in this list
        #[arg(
            long = "classes",
            use_value_delimiter = true,
            default_value = "licence"
        )]
        classes: Vec<String>,
    },
    /// Build a TFRecord dataset from images and their YOLO labels
    WriteRecords {
        /// Dataset root containing images/ and labels/ subdirectories
        #[arg(long = "images_path")]
        images_path: PathBuf,

        /// Path to the label map pbtxt file
        #[arg(long = "label_map")]
        label_map: PathBuf,

        /// Path of the TFRecord file to create
        #[arg(long = "output_path")]
        output_path: PathBuf,
    },
}
