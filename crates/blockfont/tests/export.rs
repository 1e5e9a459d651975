use blockfont::{
    color::Rgb,
    export::{sanitize_filename, strip_ansi, visible_width, MAX_FILENAME_LEN},
    raster::{encode_png, rasterize, CELL_SIZE},
    ExportFormat, FontError,
};
use pretty_assertions::assert_eq;

fn painted() -> Vec<String> {
    let px = Rgb::new(255, 0, 0).paint('█');
    vec![format!("{px} {px}"), format!(" {px}")]
}

#[test]
fn strips_escape_sequences() {
    let lines = painted();
    assert_eq!(strip_ansi(&lines[0]), "█ █");
    assert_eq!(visible_width(&lines[0]), 3);
    assert_eq!(visible_width("plain"), 5);
}

#[test]
fn text_export_is_plain() {
    assert_eq!(ExportFormat::Txt.source(&painted()).as_deref(), Some("█ █\n █"));
    assert_eq!(
        ExportFormat::Txt.generate(&painted()).expect("text export"),
        "█ █\n █".as_bytes()
    );
}

#[test]
fn source_exports_escape_control_bytes() {
    for format in ExportFormat::ALL {
        if format == ExportFormat::Txt || format.is_binary() {
            continue;
        }
        let source = format.source(&painted()).expect("text format");
        assert!(!source.contains('\x1b'), "{format} leaks a raw escape");
        assert!(source.contains("\\x1b[38;2;255;0;0m█\\x1b[0m"), "{format}");
    }
}

#[test]
fn shell_export_quotes_expansions() {
    let source = ExportFormat::Sh
        .source(&["$HOME `id`".to_string()])
        .expect("text format");
    assert!(source.contains("\"\\$HOME \\`id\\`\""));
    assert!(source.starts_with("#!/bin/bash\n"));
}

#[test]
fn formats_parse_by_extension_or_language() {
    assert_eq!("rs".parse::<ExportFormat>(), Ok(ExportFormat::Rs));
    assert_eq!(".PY".parse::<ExportFormat>(), Ok(ExportFormat::Py));
    assert_eq!("javascript".parse::<ExportFormat>(), Ok(ExportFormat::Js));
    assert_eq!("png".parse::<ExportFormat>(), Ok(ExportFormat::Png));
    assert!("pdf".parse::<ExportFormat>().is_err());
    assert_eq!(ExportFormat::Go.to_string(), "GO");
}

#[test]
fn file_names_are_sanitized() {
    assert_eq!(
        ExportFormat::Txt.file_name("../etc/passwd").as_deref(),
        Some("etcpasswd.txt")
    );
    assert_eq!(ExportFormat::Go.file_name("banner.go").as_deref(), Some("banner.go"));
    assert_eq!(ExportFormat::Sh.file_name(" ..\\.. "), None);
    assert_eq!(sanitize_filename("a<b>c|d?"), "abcd");
    assert_eq!(sanitize_filename(&"x".repeat(300)).len(), MAX_FILENAME_LEN);
}

#[test]
fn png_export_is_binary() {
    assert!(ExportFormat::Png.is_binary());
    assert_eq!(ExportFormat::Png.source(&painted()), None);
    let bytes = ExportFormat::Png.generate(&painted()).expect("png export");
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    assert_eq!(bytes, encode_png(&painted(), CELL_SIZE).expect("png"));
}

#[test]
fn raster_fills_cells_by_block_shape() {
    let red = Rgb::new(255, 0, 0);
    let lines = vec![
        format!("{}{}", red.paint('█'), red.paint('▀')),
        format!("{} {}", red.paint('▄'), red.paint('▒')),
    ];
    let img = rasterize(&lines, 4).expect("raster");
    assert_eq!((img.width(), img.height()), (12, 8));

    let opaque = [255, 0, 0, 255];
    let clear = [0, 0, 0, 0];
    // full block
    assert_eq!(img.get_pixel(0, 0).0, opaque);
    assert_eq!(img.get_pixel(3, 3).0, opaque);
    // upper half block
    assert_eq!(img.get_pixel(4, 1).0, opaque);
    assert_eq!(img.get_pixel(4, 2).0, clear);
    // the first row is two cells wide
    assert_eq!(img.get_pixel(8, 0).0, clear);
    // lower half block
    assert_eq!(img.get_pixel(0, 5).0, clear);
    assert_eq!(img.get_pixel(0, 6).0, opaque);
    // space, then medium shade
    assert_eq!(img.get_pixel(5, 6).0, clear);
    assert_eq!(img.get_pixel(9, 6).0, [255, 0, 0, 128]);
}

#[test]
fn nothing_to_rasterize() {
    assert!(matches!(rasterize(&[], CELL_SIZE), Err(FontError::EmptyExport)));
}
