use clap::Parser;
use log::info;

use voc2record::{convert_labels, load_annotation_index, write_records, Args, Command, LabelMap};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match args.command {
        Command::ConvertLabels {
            xml_dir,
            label_dir,
            classes,
        } => {
            let converted = convert_labels(&xml_dir, &label_dir, &classes)?;
            info!(
                "Conversion complete: {} label files written to {}",
                converted,
                label_dir.display()
            );
        }
        Command::WriteRecords {
            images_path,
            label_map,
            output_path,
        } => {
            let label_map = LabelMap::load(&label_map)?;
            let index = load_annotation_index(&images_path.join("labels"))?;
            info!("Loaded annotations for {} label files.", index.len());
            let written = write_records(&images_path, &index, &label_map, &output_path)?;
            info!(
                "TFRecord with {} records created at: {}",
                written,
                output_path.display()
            );
        }
    }

    Ok(())
}
