use std::env;
use std::fs;
use std::path::Path;

use diagram_core::{
    AssetStore, BuiltinAssets, CachedAssets, Command, DiagramFile, Outcome, Session,
};

mod store;

use store::DirAssets;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: diagram <diagram.json | record> <output-dir> [assets-dir]");
        std::process::exit(2);
    }
    let input = &args[1];
    let out_dir = Path::new(&args[2]);

    // A .json path is a diagram file; anything else is a position record.
    let file = if input.ends_with(".json") && Path::new(input).is_file() {
        DiagramFile::from_json(&fs::read_to_string(input)?)?
    } else {
        DiagramFile {
            notation: Some(input.clone()),
            ..Default::default()
        }
    };

    let assets: Box<dyn AssetStore> = match args.get(3) {
        Some(dir) => Box::new(DirAssets::new(dir)),
        None => Box::new(BuiltinAssets),
    };
    let mut session = Session::with_assets(CachedAssets::new(assets));
    if let Some(layout) = file.layout.clone() {
        session = session.with_layout(layout)?;
    }

    for cmd in file.commands()? {
        // Skipped notation squares are logged by the decoder.
        if let Outcome::Imported(report) = session.dispatch(cmd)?
            && report.placed == 0
        {
            eprintln!("warning: the position record placed no pieces");
        }
    }
    print!("{}", session.board());

    fs::create_dir_all(out_dir)?;
    for format in file.formats() {
        if let Outcome::Exported(artifact) = session.dispatch(Command::Export(format))? {
            let path = out_dir.join(artifact.file_name);
            fs::write(&path, &artifact.bytes)?;
            println!("wrote {} ({})", path.display(), artifact.media_type);
        }
    }
    Ok(())
}
