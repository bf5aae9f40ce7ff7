#![allow(missing_docs)]
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, warn};

use apisplit_core::ToYaml;
use apisplit_core::resolve::{FsLoader, Resolver};
use apisplit_core::split::{PartitionConfig, Partitioner, SourceDocument, UidEntry};
use apisplit_core::toc::NavigationPatch;
use apisplit_core::{ApiSplitError, prepare_documents};

const HELP: &str = "\
apisplit: split Swagger documents by tag or by operation

USAGE:
  apisplit [OPTIONS] <DOCUMENT>...

OPTIONS:
  -r, --root <DIR>        Directory the documents are relative to [default: .]
  -o, --out <DIR>         Output directory [default: _split]
  -t, --by-tag            Split documents by tag
  -p, --by-operation      Split documents by operation
      --toc-patch <FILE>  Navigation patch file, inside the output directory [default: toc-patches.json]
  -h, --help              Print help
";

fn main() -> Result<()> {
    tracing_subscriber::fmt().pretty().init();

    let Some(args) = AppArgs::parse().context("parsing arguments")? else {
        return Ok(());
    };

    let mut resolver = Resolver::new(FsLoader::new(&args.root));
    let (documents, failures) = prepare_documents(&mut resolver, &args.documents);

    let config = PartitionConfig::default()
        .with_by_tag(args.by_tag)
        .with_by_operation(args.by_operation);
    let output = Partitioner::new(config).run(documents);

    for document in &output.documents {
        write_document(&args.out, document)
            .with_context(|| format!("writing {}", document.path.display()))?;
    }

    let report = Report {
        patches: &output.patches,
        uids: &output.uids,
    };
    let report_path = args.out.join(&args.toc_patch);
    write_file(&report_path, &serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("writing {}", report_path.display()))?;
    info!(
        documents = output.documents.len(),
        patches = output.patches.len(),
        out = %args.out.display(),
        "documents written"
    );

    if !failures.is_empty() {
        for (path, error) in &failures {
            warn!(path = %path.display(), %error, "document failed");
        }
        bail!("{} document(s) failed", failures.len());
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    patches: &'a [NavigationPatch],
    uids: &'a [UidEntry],
}

fn write_document(out: &Path, document: &SourceDocument) -> Result<(), ApiSplitError> {
    let is_yaml = document
        .path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let contents = if is_yaml {
        document.item.to_yaml()?
    } else {
        serde_json::to_string_pretty(&document.item)?
    };
    write_file(&out.join(&document.path), &contents)?;
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

#[derive(Debug)]
struct AppArgs {
    root: PathBuf,
    out: PathBuf,
    by_tag: bool,
    by_operation: bool,
    toc_patch: PathBuf,
    documents: Vec<PathBuf>,
}

impl AppArgs {
    #[allow(clippy::print_stdout)]
    fn parse() -> Result<Option<Self>> {
        let mut pargs = pico_args::Arguments::from_env();

        if pargs.contains(["-h", "--help"]) {
            print!("{HELP}");
            return Ok(None);
        }

        let root = pargs
            .opt_value_from_str(["-r", "--root"])
            .context("parsing root argument")?;
        let out = pargs
            .opt_value_from_str(["-o", "--out"])
            .context("parsing out argument")?;
        let toc_patch = pargs
            .opt_value_from_str("--toc-patch")
            .context("parsing toc-patch argument")?;
        let by_tag = pargs.contains(["-t", "--by-tag"]);
        let by_operation = pargs.contains(["-p", "--by-operation"]);

        let mut documents = Vec::new();
        while let Some(document) = pargs
            .opt_free_from_str::<PathBuf>()
            .context("parsing documents")?
        {
            documents.push(document);
        }
        if documents.is_empty() {
            bail!("no document given, see --help");
        }

        let result = Self {
            root: root.unwrap_or_else(|| PathBuf::from(".")),
            out: out.unwrap_or_else(|| PathBuf::from("_split")),
            by_tag,
            by_operation,
            toc_patch: toc_patch.unwrap_or_else(|| PathBuf::from("toc-patches.json")),
            documents,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            warn!(?remaining, "Warning: unused arguments left");
        }
        Ok(Some(result))
    }
}
