use std::fs;
use std::path::Path as FsPath;

use anyhow::{bail, Context};
use colored::{ColoredString, Colorize};
use serde_json::json;

use revlens_sdk::{
    ChangeNode, ChangeType, Comparison, ComparisonView, Decomposer, DirRevisionStore, Granularity,
    LineStyle, Path, RenderedLine, Revlens, RevlensConfig, SideBySide,
};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = RevlensConfig::load_or_default(cli.config.as_ref())
        .context("loading configuration")?;
    let json = matches!(cli.format, OutputFormat::Json);
    match cli.command {
        Command::Compare(args) => cmd_compare(args, config, json),
        Command::Decompose(args) => cmd_decompose(args, config, json),
        Command::History(args) => cmd_history(args, config, json),
        Command::Diff(args) => cmd_diff(args, config, json),
    }
}

fn cmd_compare(args: CompareArgs, mut config: RevlensConfig, json: bool) -> anyhow::Result<()> {
    apply_view(&mut config, &args.view);
    let old = read(&args.old)?;
    let new = read(&args.new)?;

    let decomposer = Decomposer::new(config.decompose.clone());
    let view = ComparisonView::build(&decomposer, config.display.highlight_policy(), &old, &new);
    let headers = (
        format!("Old - {}", args.old.display()),
        format!("New - {}", args.new.display()),
    );
    print!("{}", report(&view, &headers, &args.view, &config, json)?);
    Ok(())
}

fn cmd_diff(args: DiffArgs, mut config: RevlensConfig, json: bool) -> anyhow::Result<()> {
    apply_view(&mut config, &args.view);
    let store = DirRevisionStore::open(args.root.clone())
        .with_context(|| format!("opening revision store {}", args.root.display()))?;
    let revlens = Revlens::new(store, config);

    let cmp = match (&args.left, &args.right) {
        (Some(left), Some(right)) => revlens.compare_revisions(&args.item, left, right)?,
        (Some(left), None) => revlens.compare_with_previous(&args.item, left)?,
        (None, _) => revlens.compare_latest(&args.item)?,
    };
    print!(
        "{}",
        report(&cmp.view, &cmp.side_labels(), &args.view, revlens.config(), json)?
    );
    Ok(())
}

fn cmd_decompose(args: DecomposeArgs, mut config: RevlensConfig, json: bool) -> anyhow::Result<()> {
    if args.block {
        config.decompose.granularity = Granularity::Block;
    }
    let text = read(&args.file)?;
    let result = Decomposer::new(config.decompose)
        .decompose(&text)
        .with_context(|| format!("decomposing {}", args.file.display()))?;

    if let Some(key) = &args.show {
        let key = parse_key(key);
        let Some(component) = result.get(&key) else {
            bail!("no component {key} in {}", args.file.display());
        };
        if json {
            println!("{}", serde_json::to_string_pretty(component)?);
        } else {
            println!("{}", component.content);
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    println!("{} {} components", "✓".green().bold(), result.len());
    for component in &result {
        println!(
            "  {}  {} {}",
            component.key.to_string().cyan(),
            component.display_name.bold(),
            format!(
                "[{}, {} lines]",
                component.category.label(),
                component.content.lines().count()
            )
            .dimmed()
        );
    }
    Ok(())
}

fn cmd_history(args: HistoryArgs, config: RevlensConfig, json: bool) -> anyhow::Result<()> {
    let store = DirRevisionStore::open(args.root.clone())
        .with_context(|| format!("opening revision store {}", args.root.display()))?;
    let history = Revlens::new(store, config).history(&args.item)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }
    let now = chrono::Utc::now();
    println!("{} ({} revisions)", args.item.bold(), history.len());
    for rev in &history {
        println!(
            "  {:<10} {:<22} {:<12} {}",
            rev.short_label().yellow().bold(),
            rev.age_label(now).dimmed(),
            rev.committer.as_deref().unwrap_or("-"),
            rev.message.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

// ---- Helpers ----

fn read(path: &FsPath) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Component keys are written with `/` between segments.
fn parse_key(text: &str) -> Path {
    text.split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn apply_view(config: &mut RevlensConfig, view: &ViewArgs) {
    if view.changed_only {
        config.display.changed_only = true;
    }
    if view.no_intraline {
        config.display.intraline = false;
    }
    if view.block {
        config.decompose.granularity = Granularity::Block;
    }
}

/// Components whose detail view is printed.
fn detail_keys(c: &Comparison, view: &ViewArgs) -> Vec<Path> {
    if let Some(key) = &view.component {
        vec![parse_key(key)]
    } else if view.all {
        c.diff()
            .iter()
            .filter(|ch| ch.change.is_changed())
            .map(|ch| ch.key.clone())
            .collect()
    } else {
        c.initial_selection().cloned().into_iter().collect()
    }
}

fn report(
    view: &ComparisonView,
    headers: &(String, String),
    args: &ViewArgs,
    config: &RevlensConfig,
    json: bool,
) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&json_report(view, headers, args, config)?)? + "\n");
    }

    let mut out = format!("{}\n{}\n", headers.0.red(), headers.1.green());
    match view {
        ComparisonView::Raw(raw) => {
            out.push_str(&format!(
                "{} {}\n",
                "!".yellow().bold(),
                format!("not decomposed, {}", raw.reason).yellow()
            ));
            out.push_str(&render_rows(&raw.view));
        }
        ComparisonView::Decomposed(c) => {
            out.push_str(&format!("{}\n", c.summary().bold()));
            out.push_str(&render_tree(c, config.display.changed_only, config.display.labels));
            if args.raw {
                out.push_str(&format!("\n{}\n", "== whole document".dimmed()));
                out.push_str(&render_rows(&c.raw()));
            } else {
                for key in detail_keys(c, args) {
                    let Some(detail) = c.detail(&key) else {
                        bail!("no component {key} in either revision");
                    };
                    out.push_str(&format!(
                        "\n{} {}\n",
                        "==".dimmed(),
                        c.label_with_change(&key).bold()
                    ));
                    out.push_str(&render_rows(&detail));
                }
            }
        }
    }
    Ok(out)
}

fn json_report(
    view: &ComparisonView,
    headers: &(String, String),
    args: &ViewArgs,
    config: &RevlensConfig,
) -> anyhow::Result<serde_json::Value> {
    let value = match view {
        ComparisonView::Raw(raw) => json!({
            "left": headers.0,
            "right": headers.1,
            "raw": true,
            "reason": raw.reason,
            "summary": view.summary(),
            "view": raw.view,
        }),
        ComparisonView::Decomposed(c) => {
            let components: Vec<_> = c
                .diff()
                .iter()
                .map(|ch| {
                    json!({
                        "key": ch.key.to_string(),
                        "label": c.label(&ch.key),
                        "change": ch.change,
                    })
                })
                .collect();
            let statuses = c
                .statuses()
                .iter()
                .filter(|(path, _)| !path.is_root())
                .map(|(path, change)| Ok((path.to_string(), serde_json::to_value(change)?)))
                .collect::<serde_json::Result<serde_json::Map<_, _>>>()?;
            let mut details = Vec::new();
            if args.raw {
                details.push(json!({ "key": null, "view": c.raw() }));
            } else {
                for key in detail_keys(c, args) {
                    let Some(detail) = c.detail(&key) else {
                        bail!("no component {key} in either revision");
                    };
                    details.push(json!({ "key": key.to_string(), "view": detail }));
                }
            }
            json!({
                "left": headers.0,
                "right": headers.1,
                "raw": false,
                "summary": c.summary(),
                "changed": c.diff().changed_count(),
                "total": c.diff().total(),
                "components": components,
                "statuses": statuses,
                "tree": c.display_tree(config.display.changed_only),
                "details": details,
            })
        }
    };
    Ok(value)
}

// ---- Text rendering ----

fn render_tree(c: &Comparison, changed_only: bool, labels: bool) -> String {
    let tree = c.display_tree(changed_only);
    let mut out = String::new();
    for child in &tree.children {
        write_node(c, child, 0, labels, &mut out);
    }
    out
}

fn write_node(c: &Comparison, node: &ChangeNode, depth: usize, labels: bool, out: &mut String) {
    let label = if labels {
        c.label_with_change(&node.path)
    } else {
        c.label(&node.path)
    };
    let marker = match node.change {
        ChangeType::Unchanged => ' ',
        ChangeType::Modified => '~',
        ChangeType::LeftOnly => '-',
        ChangeType::RightOnly => '+',
    };
    let line = format!("{}{marker} {label}", "  ".repeat(depth));
    out.push_str(&format!("{}\n", paint_change(node.change, &line)));
    for child in &node.children {
        write_node(c, child, depth + 1, labels, out);
    }
}

fn paint_change(change: ChangeType, text: &str) -> ColoredString {
    match change {
        ChangeType::Unchanged => text.normal(),
        ChangeType::Modified => text.yellow(),
        ChangeType::LeftOnly => text.red(),
        ChangeType::RightOnly => text.green(),
    }
}

fn number(line: &RenderedLine) -> String {
    line.number.map(|n| n.to_string()).unwrap_or_default()
}

/// `<old no> <new no> <sign> <text>`, one line per unchanged row and one
/// per non-padding side of a changed row.
fn render_rows(view: &SideBySide) -> String {
    let mut out = String::new();
    for row in &view.rows {
        if !row.is_changed() {
            out.push_str(&format!(
                "{:>4} {:>4}   {}\n",
                number(&row.left),
                number(&row.right),
                row.left.text
            ));
            continue;
        }
        if !row.left.is_padding() {
            out.push_str(&format!(
                "{:>4} {:>4} {} {}\n",
                number(&row.left),
                "",
                "-".red(),
                paint_line(&row.left)
            ));
        }
        if !row.right.is_padding() {
            out.push_str(&format!(
                "{:>4} {:>4} {} {}\n",
                "",
                number(&row.right),
                "+".green(),
                paint_line(&row.right)
            ));
        }
    }
    out
}

/// Colour a changed line, emphasising its highlighted character ranges.
fn paint_line(line: &RenderedLine) -> String {
    let paint = |text: &str, highlighted: bool| {
        let base = match line.style {
            LineStyle::Deleted | LineStyle::ChangedOld => text.red(),
            LineStyle::Inserted | LineStyle::ChangedNew => text.green(),
            LineStyle::Unchanged | LineStyle::Padding => text.normal(),
        };
        if highlighted {
            base.bold().underline().to_string()
        } else {
            base.to_string()
        }
    };

    let chars: Vec<char> = line.text.chars().collect();
    let slice = |from: usize, to: usize| chars[from..to].iter().collect::<String>();
    let mut out = String::new();
    let mut pos = 0;
    for range in &line.highlights {
        let start = range.start.clamp(pos, chars.len());
        let end = range.end.clamp(start, chars.len());
        if start > pos {
            out.push_str(&paint(&slice(pos, start), false));
        }
        if end > start {
            out.push_str(&paint(&slice(start, end), true));
        }
        pos = end;
    }
    if pos < chars.len() {
        out.push_str(&paint(&slice(pos, chars.len()), false));
    }
    out
}
