use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use zip::ZipArchive;

const FONT_FILE: &str = "DejaVuSans-Bold.ttf";
const ZIP_URL: &str = "https://github.com/dejavu-fonts/dejavu-fonts/releases/download/version_2_37/dejavu-fonts-ttf-2.37.zip";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=FONT_TTF");
    println!("cargo:rerun-if-env-changed=DIAGRAM_FONTS_OFFLINE");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let target_font = out_dir.join(FONT_FILE);

    // Incremental build: keep a previously fetched font.
    if target_font.exists() && fs::metadata(&target_font).map(|m| m.len() > 0).unwrap_or(false) {
        return;
    }

    if let Ok(path) = env::var("FONT_TTF") {
        match fs::copy(&path, &target_font) {
            Ok(_) => return,
            Err(e) => println!("cargo:warning=failed to copy FONT_TTF {path}: {e}"),
        }
    }

    if env::var_os("DIAGRAM_FONTS_OFFLINE").is_none() {
        match download_font(&out_dir, &target_font) {
            Ok(()) => return,
            Err(e) => println!("cargo:warning={e}; labels will use system fonts"),
        }
    }

    // An empty font makes the rasterizer fall back to system fonts.
    fs::write(&target_font, []).expect("write empty font placeholder");
}

fn download_font(out_dir: &Path, target_font: &Path) -> Result<(), String> {
    let zip_path = out_dir.join("dejavu-fonts.zip");
    let zip_str = zip_path.to_str().ok_or("non-utf8 OUT_DIR")?;
    let fetched = Command::new("curl")
        .args(["-L", "-f", "-s", "--max-time", "60", "-o", zip_str, ZIP_URL])
        .status()
        .map(|st| st.success())
        .unwrap_or(false)
        || Command::new("wget")
            .args(["-q", "-T", "60", "-O", zip_str, ZIP_URL])
            .status()
            .map(|st| st.success())
            .unwrap_or(false);
    if !fetched {
        return Err(format!("failed to download {ZIP_URL}"));
    }

    let mut data = Vec::new();
    fs::File::open(&zip_path)
        .and_then(|mut f| f.read_to_end(&mut data))
        .map_err(|e| format!("zip read failed: {e}"))?;
    let mut zip = ZipArchive::new(std::io::Cursor::new(data))
        .map_err(|e| format!("zip parse failed: {e}"))?;
    for i in 0..zip.len() {
        let mut file = zip.by_index(i).map_err(|e| format!("zip entry: {e}"))?;
        if file.name().ends_with(FONT_FILE) {
            let mut buf = Vec::new();
            std::io::copy(&mut file, &mut buf).map_err(|e| format!("extract failed: {e}"))?;
            fs::write(target_font, &buf).map_err(|e| format!("write font failed: {e}"))?;
            return Ok(());
        }
    }
    Err(format!("{FONT_FILE} not found in {ZIP_URL}"))
}
