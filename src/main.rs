//! # chatlens CLI
//!
//! Command-line interface for the chatlens library.

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use chatlens::ChatlensError;
use chatlens::cli::{Args, DEFAULT_INPUT_DIR};
use chatlens::config::AnalysisConfig;
use chatlens::core::models::CountTable;
use chatlens::core::output::{ExportConfig, OutputFormat, write_csv_report, write_json_report};
use chatlens::corpus::load_dir;
use chatlens::parser::ChatLogParser;
use chatlens::report::{AnalysisReport, analyze};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ChatlensError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();
    chatlens::logging::init(args.verbose);

    let base = match args.config {
        Some(ref path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    let config = args.apply_to(base);
    config.validate()?;

    let input_dir = config
        .input_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR));
    let format: OutputFormat = args.format.into();

    // Print header
    println!("🔎 chatlens v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:    {}", input_dir.display());
    println!("💾 Output:   {}", args.output_dir.display());
    println!("📄 Format:   {}", args.format);
    println!("🏪 Operator: {}", config.operator);
    if let Some(ref path) = args.config {
        println!("⚙️  Config:   {}", path.display());
    }
    if config.parser.join_continuations {
        println!("🧵 Joining continuation lines");
    }
    println!();

    // Step 1: Parse
    println!("⏳ Parsing *.{} files...", config.extension);
    let parse_start = Instant::now();
    let parser = ChatLogParser::with_config(config.parser.clone());
    let corpus = load_dir(&input_dir, &config.extension, &parser)?;
    println!(
        "   Found {} messages in {} files ({:.2}s)",
        corpus.messages.len(),
        corpus.files_read,
        parse_start.elapsed().as_secs_f64()
    );
    for skipped in &corpus.skipped_files {
        println!("   ⚠️  Skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    if corpus.skipped_lines > 0 || corpus.invalid_timestamps > 0 {
        println!(
            "   Ignored {} unmatched lines, {} invalid timestamps",
            corpus.skipped_lines, corpus.invalid_timestamps
        );
    }

    if corpus.is_empty() {
        eprintln!(
            "⚠️  No messages could be parsed from {}; nothing to analyse.",
            input_dir.display()
        );
        return Ok(());
    }

    // Step 2: Analyse
    println!("📈 Analysing...");
    let analysis_start = Instant::now();
    let report = analyze(&corpus, &config);
    println!(
        "   {} conversations ({:.2}s)",
        report.stats.conversations,
        analysis_start.elapsed().as_secs_f64()
    );

    // Step 3: Export
    println!("💾 Writing {}...", args.format);
    let write_start = Instant::now();
    let mut written = Vec::new();
    if format.includes_csv() {
        written.extend(write_csv_report(
            &corpus,
            &report,
            &args.output_dir,
            &ExportConfig::new(),
        )?);
    }
    if format.includes_json() {
        written.push(write_json_report(&report, &args.output_dir)?);
    }
    println!(
        "   {} files written in {:.2}s",
        written.len(),
        write_start.elapsed().as_secs_f64()
    );

    println!();
    println!("✅ Done! Output saved to {}", args.output_dir.display());

    print_summary(&report);

    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    let stats = &report.stats;

    println!();
    println!("📊 Summary:");
    println!("   Files:          {}", stats.files_read);
    println!("   Messages:       {}", stats.messages);
    println!("   From customers: {}", stats.customer_messages);
    println!("   Conversations:  {}", stats.conversations);

    print_table("👥 Top senders", &report.top_senders);
    print_table("🛍️  Product mentions", &report.product_mentions);
    print_table("❓ Question types", &report.question_types);
    print_table("📍 Locations", &report.locations);

    println!();
    println!("⏱️  Response time:");
    let latency = &report.latency_summary;
    match (latency.mean_minutes, latency.median_minutes) {
        (Some(mean), Some(median)) => {
            println!("   Mean:     {:.1} min", mean);
            println!("   Median:   {:.1} min", median);
            println!(
                "   Measured: {} conversations ({} over {} min excluded)",
                latency.filtered, latency.excluded, report.latency.threshold_minutes
            );
        }
        _ => println!("   No customer → operator replies measured"),
    }

    println!();
    println!("🪜 Funnel:");
    for stage in &report.funnel_stages {
        match stage.percent_of_total {
            Some(pct) => println!(
                "   {:<45} {:>5} ({:.1}%)",
                stage.stage, stage.conversations, pct
            ),
            None => println!("   {:<45} {:>5}", stage.stage, stage.conversations),
        }
    }

    println!();
    println!(
        "🔕 Unanswered (operator spoke last): {}",
        report.unanswered.len()
    );
    for row in &report.drop_off_reasons {
        println!("   {:<40} {}", row.label, row.count);
    }
}

fn print_table(title: &str, table: &CountTable) {
    println!();
    println!("{}:", title);
    if table.is_empty() {
        println!("   (none)");
        return;
    }
    for row in table {
        println!("   {:<40} {}", row.label, row.count);
    }
}
