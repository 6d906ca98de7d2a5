//! untnef - Extract message bodies and attachments from TNEF files
//!
//! This tool decodes `winmail.dat` style TNEF containers and writes the
//! attachments (and optionally the message bodies) they carry to disk.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, ValueEnum};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, trace, warn, Level};
use tracing_subscriber::EnvFilter;
use untnef_core::tags::TNEF_SIGNATURE;
use untnef_core::{DecodedMessage, Decoder, DecoderConfig};
use walkdir::WalkDir;

/// Default upper bound on input size
const DEFAULT_MAX_SIZE: usize = 64 * 1024 * 1024;

/// Extract message bodies and attachments from TNEF (winmail.dat) files
#[derive(Parser, Debug)]
#[command(name = "untnef")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    input: InputMode,

    /// Output directory for extracted files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Skip inputs larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE)]
    max_size: usize,

    /// Also write the message bodies (body.txt, body.html, body.rtf)
    #[arg(long)]
    bodies: bool,

    /// Print repairs the decoder made to malformed input
    #[arg(long)]
    warnings: bool,

    /// Don't write files, just show what would be extracted
    #[arg(long)]
    dry_run: bool,

    /// Overwrite existing files
    #[arg(long)]
    force: bool,

    /// Only list attachment names and sizes
    #[arg(long)]
    list_only: bool,

    /// What to do when two different files want the same name
    #[arg(long, value_enum, default_value = "hash-suffix")]
    conflict_strategy: ConflictStrategy,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputMode {
    /// Path to a single TNEF file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a directory searched recursively for TNEF files
    #[arg(short, long)]
    directory: Option<PathBuf>,
}

/// Strategy for resolving naming conflicts
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConflictStrategy {
    /// Append a short content hash: report~a1b2c3d4.pdf
    HashSuffix,
    /// Append the source file name: report~from-winmail.pdf
    SourceSuffix,
    /// Keep the first file of each name only
    SkipConflicts,
}

/// A file recovered from one message, named but not yet placed
#[derive(Debug, Clone, PartialEq, Eq)]
struct ExtractedFile {
    name: String,
    content: Vec<u8>,
}

impl ExtractedFile {
    fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }
}

/// Outcome of placing an extracted file in the output directory
#[derive(Debug, PartialEq, Eq)]
enum Placement {
    /// Write under this file name
    Write(String),
    /// The same content already went out under this name
    Identical,
    /// Different content holds the name and conflicts are skipped
    Skipped,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ExtractStats {
    found: usize,
    identical: usize,
    skipped: usize,
    renamed: usize,
    written: usize,
}

/// Content placed under each output name across all processed messages.
///
/// Winmail files forwarded around a thread tend to carry the same
/// attachment many times, so identical content is written once.
#[derive(Default)]
struct OutputIndex {
    placed: HashMap<String, Vec<blake3::Hash>>,
    stats: ExtractStats,
}

impl OutputIndex {
    fn new() -> Self {
        Self::default()
    }

    fn place(
        &mut self,
        file: &ExtractedFile,
        source: &Path,
        strategy: ConflictStrategy,
    ) -> Placement {
        self.stats.found += 1;

        let hash = blake3::hash(&file.content);
        let hashes = self.placed.entry(file.name.clone()).or_default();
        if hashes.contains(&hash) {
            debug!("{} already extracted with identical content", file.name);
            self.stats.identical += 1;
            return Placement::Identical;
        }

        let first = hashes.is_empty();
        hashes.push(hash);
        if first {
            return Placement::Write(file.name.clone());
        }

        let renamed = match strategy {
            ConflictStrategy::SkipConflicts => {
                debug!("Skipping {} from {}: name taken", file.name, source.display());
                self.stats.skipped += 1;
                return Placement::Skipped;
            }
            ConflictStrategy::HashSuffix => with_suffix(&file.name, &hash.to_hex()[..8]),
            ConflictStrategy::SourceSuffix => {
                let stem = source
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown");
                with_suffix(&file.name, &format!("from-{}", stem))
            }
        };
        info!("{} from {} renamed to {}", file.name, source.display(), renamed);
        self.stats.renamed += 1;
        Placement::Write(renamed)
    }

    fn print_summary(&self) {
        let stats = &self.stats;
        info!(
            "Summary: {} found, {} identical, {} skipped, {} renamed, {} written",
            stats.found, stats.identical, stats.skipped, stats.renamed, stats.written
        );
    }
}

/// `report.pdf` + `tag` -> `report~tag.pdf`
fn with_suffix(name: &str, tag: &str) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}~{}{}", &name[..dot], tag, &name[dot..]),
        _ => format!("{}~{}", name, tag),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();

    if let Some(ref file) = cli.input.file {
        process_single_file(&cli, file, &mut out, &mut err)
    } else if let Some(ref directory) = cli.input.directory {
        process_directory(&cli, directory, &mut out, &mut err).map(|_| ())
    } else {
        bail!("Either --file or --directory must be specified")
    }
}

/// Process a single TNEF file
fn process_single_file(
    cli: &Cli,
    file: &Path,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    if !file.is_file() {
        bail!("Input file does not exist: {}", file.display());
    }

    let mut index = OutputIndex::new();
    process_tnef(cli, file, &mut index, out, err)?;

    if !cli.list_only && !cli.dry_run {
        index.print_summary();
    }
    Ok(())
}

/// Process every TNEF file below a directory, returning how many succeeded
fn process_directory(
    cli: &Cli,
    directory: &Path,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<usize> {
    if !directory.is_dir() {
        bail!("Directory does not exist: {}", directory.display());
    }

    info!("Scanning directory: {}", directory.display());

    let mut index = OutputIndex::new();
    let mut processed = 0;
    let mut failed = 0;

    for entry in WalkDir::new(directory)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || !is_likely_tnef(path, cli.max_size) {
            trace!("Skipping {}", path.display());
            continue;
        }

        match process_tnef(cli, path, &mut index, out, err) {
            Ok(()) => processed += 1,
            Err(e) => {
                // Keep going with the other files
                warn!("Error processing {}: {:#}", path.display(), e);
                failed += 1;
            }
        }
    }

    info!("Processed {} TNEF files, {} failed", processed, failed);

    if !cli.list_only && !cli.dry_run {
        index.print_summary();
    }
    Ok(processed)
}

/// Size bounds plus the TNEF signature, without reading the whole file
fn is_likely_tnef(path: &Path, max_size: usize) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    let size = metadata.len();
    if size < 6 || (max_size > 0 && size > max_size as u64) {
        return false;
    }

    let Ok(mut file) = fs::File::open(path) else {
        return false;
    };
    let mut magic = [0u8; 4];
    file.read_exact(&mut magic).is_ok() && u32::from_le_bytes(magic) == TNEF_SIGNATURE
}

/// Reduce an attachment title to a bare file name
fn sanitize_filename(name: &str, index: usize) -> String {
    let base: String = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control())
        .collect();
    let base = base.trim();

    if base.is_empty() || base == "." || base == ".." {
        format!("attachment-{}.bin", index + 1)
    } else {
        base.to_string()
    }
}

/// Attachments, then the bodies when asked for
fn extracted_files(message: &DecodedMessage, bodies: bool) -> Vec<ExtractedFile> {
    let mut files: Vec<ExtractedFile> = message
        .attachments
        .iter()
        .enumerate()
        .map(|(i, attachment)| {
            let name = sanitize_filename(attachment.filename().unwrap_or_default(), i);
            ExtractedFile::new(name, attachment.data.clone())
        })
        .collect();

    if !bodies {
        return files;
    }

    if !message.body.is_empty() {
        files.push(ExtractedFile::new("body.txt", message.body.clone()));
    }
    if !message.body_html.is_empty() {
        files.push(ExtractedFile::new("body.html", message.body_html.clone()));
    }
    match message.rtf_body_decompressed() {
        Ok(rtf) if !rtf.is_empty() => files.push(ExtractedFile::new("body.rtf", rtf)),
        Ok(_) => {}
        Err(e) => warn!("Could not decompress RTF body: {}", e),
    }
    files
}

/// Decode one TNEF file and extract its content
fn process_tnef(
    cli: &Cli,
    path: &Path,
    index: &mut OutputIndex,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    let config = DecoderConfig::new()
        .max_input_size(cli.max_size)
        .collect_warnings(cli.warnings);

    let message = Decoder::with_config(config)
        .decode_file(path)
        .with_context(|| format!("Failed to decode TNEF file: {}", path.display()))?;

    debug!(
        "Found {} attachment(s) in {}",
        message.attachments.len(),
        path.display()
    );

    for warning in &message.warnings {
        writeln!(err, "{}: warning: {}", path.display(), warning)?;
    }

    for file in extracted_files(&message, cli.bodies) {
        if cli.list_only {
            writeln!(out, "{}\t{}", file.name, file.content.len())?;
            continue;
        }

        let name = match index.place(&file, path, cli.conflict_strategy) {
            Placement::Write(name) => name,
            Placement::Identical | Placement::Skipped => continue,
        };

        if cli.dry_run {
            let target = cli.output.join(&name);
            writeln!(out, "Would write: {} ({} bytes)", target.display(), file.content.len())?;
            continue;
        }

        let target = write_output_file(&cli.output, &name, &file.content, cli.force)?;
        writeln!(out, "Wrote {}", target.display())?;
        index.stats.written += 1;
    }

    Ok(())
}

/// Write `content` as `name` directly inside `output_dir`
fn write_output_file(
    output_dir: &Path,
    name: &str,
    content: &[u8],
    force: bool,
) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    if !matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) {
        bail!("Refusing to write outside the output directory: {}", name);
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let target = output_dir.join(name);
    if target.exists() && !force {
        bail!(
            "File already exists: {} (use --force to overwrite)",
            target.display()
        );
    }

    fs::write(&target, content)
        .with_context(|| format!("Failed to write file: {}", target.display()))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use untnef_core::tags::{prop_id, Attribute};

    const MESSAGE: u8 = 1;
    const ATTACH: u8 = 2;

    fn record(out: &mut Vec<u8>, level: u8, attr: Attribute, payload: &[u8]) {
        out.push(level);
        out.extend_from_slice(&attr.tag().to_le_bytes());
        out.extend_from_slice(&[0x00, 0x06]);
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        out.extend_from_slice(&[0, 0]);
    }

    fn binary_props(props: &[(u16, &[u8])]) -> Vec<u8> {
        let mut out = (props.len() as u32).to_le_bytes().to_vec();
        for (id, value) in props {
            out.extend_from_slice(&0x0102u16.to_le_bytes());
            out.extend_from_slice(&id.to_le_bytes());
            out.extend_from_slice(&1u32.to_le_bytes());
            out.extend_from_slice(&(value.len() as u32).to_le_bytes());
            out.extend_from_slice(value);
            while out.len() % 4 != 0 {
                out.push(0);
            }
        }
        out
    }

    /// Stored ("MELA") compressed RTF
    fn stored_rtf(rtf: &[u8]) -> Vec<u8> {
        let mut out = ((rtf.len() + 12) as u32).to_le_bytes().to_vec();
        out.extend_from_slice(&(rtf.len() as u32).to_le_bytes());
        out.extend_from_slice(b"MELA");
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(rtf);
        out
    }

    /// A message with a titled and an untitled attachment, all three
    /// bodies, and one attachment record before any attachment
    fn sample_tnef() -> Vec<u8> {
        let mut data = TNEF_SIGNATURE.to_le_bytes().to_vec();
        data.extend_from_slice(&0x0101u16.to_le_bytes());
        record(&mut data, ATTACH, Attribute::AttachTitle, b"stray.txt\0");
        record(&mut data, MESSAGE, Attribute::Body, b"Plain body");
        let rtf = stored_rtf(b"{\\rtf1 hi}");
        let props = binary_props(&[
            (prop_id::BODY_HTML, &b"<p>hi</p>"[..]),
            (prop_id::RTF_COMPRESSED, rtf.as_slice()),
        ]);
        record(&mut data, MESSAGE, Attribute::MsgProps, &props);
        record(&mut data, ATTACH, Attribute::AttachRendData, &[0; 14]);
        record(&mut data, ATTACH, Attribute::AttachTitle, b"report.txt\0");
        record(&mut data, ATTACH, Attribute::AttachData, b"hello");
        record(&mut data, ATTACH, Attribute::AttachRendData, &[0; 14]);
        record(&mut data, ATTACH, Attribute::AttachData, &[0xde, 0xad, 0xbe, 0xef]);
        data
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("untnef").chain(args.iter().copied())).unwrap()
    }

    fn path_arg(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    struct Run {
        out: String,
        err: String,
        index: OutputIndex,
    }

    fn run(cli: &Cli, input: &Path) -> Run {
        let mut index = OutputIndex::new();
        let mut out = Vec::new();
        let mut err = Vec::new();
        process_tnef(cli, input, &mut index, &mut out, &mut err).unwrap();
        Run {
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
            index,
        }
    }

    #[test]
    fn test_extract_attachments_and_bodies() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("winmail.dat");
        fs::write(&input, sample_tnef()).unwrap();
        let output = temp_dir.path().join("out");

        let cli = cli(&[
            "-f",
            path_arg(&input),
            "-o",
            path_arg(&output),
            "--bodies",
            "--warnings",
        ]);
        let run = run(&cli, &input);

        assert_eq!(fs::read(output.join("report.txt")).unwrap(), b"hello");
        assert_eq!(
            fs::read(output.join("attachment-2.bin")).unwrap(),
            [0xde, 0xad, 0xbe, 0xef]
        );
        assert_eq!(fs::read(output.join("body.txt")).unwrap(), b"Plain body");
        assert_eq!(fs::read(output.join("body.html")).unwrap(), b"<p>hi</p>");
        assert_eq!(fs::read(output.join("body.rtf")).unwrap(), b"{\\rtf1 hi}");
        assert!(!output.join("stray.txt").exists());

        assert_eq!(run.index.stats.written, 5);
        assert_eq!(run.out.lines().count(), 5);
        assert!(run.err.contains("warning: attachment attribute 0x8010"));
    }

    #[test]
    fn test_bodies_and_warnings_are_opt_in() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("winmail.dat");
        fs::write(&input, sample_tnef()).unwrap();
        let output = temp_dir.path().join("out");

        let cli = cli(&["-f", path_arg(&input), "-o", path_arg(&output)]);
        let run = run(&cli, &input);

        assert!(output.join("report.txt").exists());
        assert!(!output.join("body.txt").exists());
        assert!(run.err.is_empty());
    }

    #[test]
    fn test_list_only_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("winmail.dat");
        fs::write(&input, sample_tnef()).unwrap();
        let output = temp_dir.path().join("out");

        let cli = cli(&["-f", path_arg(&input), "-o", path_arg(&output), "--list-only"]);
        let run = run(&cli, &input);

        assert_eq!(run.out, "report.txt\t5\nattachment-2.bin\t4\n");
        assert!(!output.exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("winmail.dat");
        fs::write(&input, sample_tnef()).unwrap();
        let output = temp_dir.path().join("out");

        let cli = cli(&["-f", path_arg(&input), "-o", path_arg(&output), "--dry-run"]);
        let run = run(&cli, &input);

        assert!(run.out.starts_with("Would write: "));
        assert!(run.out.contains("report.txt (5 bytes)"));
        assert!(!output.exists());
    }

    #[test]
    fn test_existing_files_need_force() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("winmail.dat");
        fs::write(&input, sample_tnef()).unwrap();
        let output = temp_dir.path().join("out");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("report.txt"), b"old").unwrap();

        let args = ["-f", path_arg(&input), "-o", path_arg(&output)];
        let mut index = OutputIndex::new();
        let result = process_tnef(&cli(&args), &input, &mut index, &mut io::sink(), &mut io::sink());
        assert!(result.is_err());

        let forced = cli(&["-f", path_arg(&input), "-o", path_arg(&output), "--force"]);
        run(&forced, &input);
        assert_eq!(fs::read(output.join("report.txt")).unwrap(), b"hello");
    }

    #[test]
    fn test_directory_resolves_conflicts() {
        let temp_dir = TempDir::new().unwrap();
        let mail = temp_dir.path().join("mail");
        fs::create_dir_all(mail.join("nested")).unwrap();
        fs::write(mail.join("a.dat"), sample_tnef()).unwrap();
        fs::write(mail.join("nested").join("b.dat"), sample_tnef()).unwrap();
        fs::write(mail.join("notes.txt"), b"not tnef").unwrap();

        // same name, different content
        let mut changed = sample_tnef();
        let at = changed.windows(5).position(|w| w == b"hello").unwrap();
        changed[at..at + 5].copy_from_slice(b"HELLO");
        fs::write(mail.join("c.dat"), changed).unwrap();

        let output = temp_dir.path().join("out");
        let cli = cli(&[
            "-d",
            path_arg(&mail),
            "-o",
            path_arg(&output),
            "--conflict-strategy",
            "source-suffix",
        ]);
        let processed = process_directory(&cli, &mail, &mut io::sink(), &mut io::sink()).unwrap();
        assert_eq!(processed, 3);

        assert_eq!(fs::read(output.join("report.txt")).unwrap(), b"hello");
        assert_eq!(fs::read(output.join("report~from-c.txt")).unwrap(), b"HELLO");
        assert_eq!(fs::read_dir(&output).unwrap().count(), 3);
    }

    #[test]
    fn test_directory_counts_only_successes() {
        let temp_dir = TempDir::new().unwrap();
        let mail = temp_dir.path().join("mail");
        fs::create_dir_all(&mail).unwrap();
        fs::write(mail.join("a.dat"), sample_tnef()).unwrap();
        let output = temp_dir.path().join("out");
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("report.txt"), b"old").unwrap();

        let cli = cli(&["-d", path_arg(&mail), "-o", path_arg(&output)]);
        let processed = process_directory(&cli, &mail, &mut io::sink(), &mut io::sink()).unwrap();
        assert_eq!(processed, 0);
        assert_eq!(fs::read(output.join("report.txt")).unwrap(), b"old");
    }

    #[test]
    fn test_index_placement() {
        let source = Path::new("/mail/winmail.dat");
        let first = ExtractedFile::new("a.txt", b"one".to_vec());
        let second = ExtractedFile::new("a.txt", b"two".to_vec());
        let mut index = OutputIndex::new();

        assert_eq!(
            index.place(&first, source, ConflictStrategy::HashSuffix),
            Placement::Write("a.txt".into())
        );
        assert_eq!(
            index.place(&first, source, ConflictStrategy::HashSuffix),
            Placement::Identical
        );

        let hash = blake3::hash(b"two").to_hex();
        assert_eq!(
            index.place(&second, source, ConflictStrategy::HashSuffix),
            Placement::Write(format!("a~{}.txt", &hash[..8]))
        );

        let third = ExtractedFile::new("a.txt", b"three".to_vec());
        assert_eq!(
            index.place(&third, source, ConflictStrategy::SourceSuffix),
            Placement::Write("a~from-winmail.txt".into())
        );

        let fourth = ExtractedFile::new("a.txt", b"four".to_vec());
        assert_eq!(
            index.place(&fourth, source, ConflictStrategy::SkipConflicts),
            Placement::Skipped
        );

        assert_eq!(
            index.stats,
            ExtractStats {
                found: 5,
                identical: 1,
                skipped: 1,
                renamed: 2,
                written: 0,
            }
        );
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(with_suffix("a.txt", "x"), "a~x.txt");
        assert_eq!(with_suffix("archive.tar.gz", "x"), "archive.tar~x.gz");
        assert_eq!(with_suffix("README", "x"), "README~x");
        assert_eq!(with_suffix(".hidden", "x"), ".hidden~x");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report.pdf", 0), "report.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd", 0), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\a.doc", 0), "a.doc");
        assert_eq!(sanitize_filename("", 2), "attachment-3.bin");
        assert_eq!(sanitize_filename("dir/..", 0), "attachment-1.bin");
        assert_eq!(sanitize_filename("a\tb.txt", 0), "ab.txt");
    }

    #[test]
    fn test_is_likely_tnef() {
        let temp_dir = TempDir::new().unwrap();

        let tnef = temp_dir.path().join("winmail.dat");
        fs::write(&tnef, sample_tnef()).unwrap();
        assert!(is_likely_tnef(&tnef, 0));
        assert!(!is_likely_tnef(&tnef, 16));

        let text = temp_dir.path().join("notes.txt");
        fs::write(&text, b"just some text").unwrap();
        assert!(!is_likely_tnef(&text, 0));
    }

    #[test]
    fn test_write_output_file_stays_in_directory() {
        let temp_dir = TempDir::new().unwrap();

        let target = write_output_file(temp_dir.path(), "a.txt", b"x", false).unwrap();
        assert_eq!(target, temp_dir.path().join("a.txt"));

        for name in ["../escape.txt", "sub/a.txt", "/etc/passwd", "..", ""] {
            assert!(write_output_file(temp_dir.path(), name, b"x", true).is_err());
        }
        assert!(!temp_dir.path().join("..").join("escape.txt").exists());
    }

    #[test]
    fn test_input_modes_are_exclusive() {
        assert!(Cli::try_parse_from(["untnef"]).is_err());
        assert!(Cli::try_parse_from(["untnef", "-f", "a", "-d", "b"]).is_err());
        assert!(Cli::try_parse_from(["untnef", "-f", "a", "--format", "files"]).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
