use anyhow::{bail, Context};
use log::LevelFilter;
use rowdoc::{Buffer, EngineConfig, Highlight, SyntaxRegistry};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (path, debug) = parse_args(&args)?;

    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    rowdoc::logging::init(level);

    let config = EngineConfig::load_default().context("failed to load configuration")?;
    let mut registry = SyntaxRegistry::builtin();
    if let Some(syntax_path) = config.syntax_path() {
        let custom = SyntaxRegistry::load(&syntax_path)
            .with_context(|| format!("failed to load {}", syntax_path.display()))?;
        registry.extend(custom);
    }

    let bytes = std::fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let name = path.display().to_string();

    let mut buffer = Buffer::from_text(name.as_str(), &text, &config);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.clone());
    buffer.select_syntax(&file_name, &registry);

    println!("{} ({}, {} rows)", name, syntax_label(&buffer), buffer.len());
    for row in buffer.rows() {
        println!("{:>4} | {}", row.index() + 1, describe_spans(row.highlight()));
    }
    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<(PathBuf, bool)> {
    let mut debug = false;
    let mut path = None;
    for arg in args {
        match arg.as_str() {
            "--debug" => debug = true,
            other if path.is_none() => path = Some(PathBuf::from(other)),
            other => bail!("unexpected argument: {}", other),
        }
    }
    match path {
        Some(path) => Ok((path, debug)),
        None => bail!("usage: rowdoc [--debug] <file>"),
    }
}

fn syntax_label(buffer: &Buffer) -> &str {
    if buffer.syntax().is_empty() {
        "plain"
    } else {
        buffer.syntax().file_type.as_str()
    }
}

/// 連続する同じ分類を `name[start..end]` にまとめる（通常分類は省略）
fn describe_spans(highlight: &[Highlight]) -> String {
    let mut spans = Vec::new();
    let mut start = 0;
    while start < highlight.len() {
        let class = highlight[start];
        let end = highlight[start..]
            .iter()
            .position(|&h| h != class)
            .map_or(highlight.len(), |offset| start + offset);
        if class != Highlight::Normal {
            spans.push(format!("{}[{}..{}]", class.name(), start, end));
        }
        start = end;
    }
    spans.join(" ")
}
