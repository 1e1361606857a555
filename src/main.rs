//! Brewforge: retail transaction analytics CLI
//!
//! This is the main entrypoint that orchestrates ingestion, the ABC and FRM
//! analyses, insight reporting, chart rendering, and the JSON export.

use anyhow::Result;
use brewforge::{abc_analysis, frm_analysis, load_transactions, report, viz, AnalysisReport, Args};
use clap::Parser;
use std::time::Instant;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    if args.verbose {
        println!("Brewforge - Retail Transaction Analytics");
        println!("========================================\n");
    }

    run_pipeline(&args)
}

/// Run the full analysis pipeline
fn run_pipeline(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    // Step 1: Load and validate transactions
    if args.verbose {
        println!("Step 1: Loading transactions");
        println!("  Input file: {}", args.input);
    }

    let data_start = Instant::now();
    let transactions = load_transactions(&args.input)?;
    let data_time = data_start.elapsed();

    println!("✓ Loaded {} transactions", transactions.len());
    if args.verbose {
        println!("  Processing time: {:.2}s", data_time.as_secs_f64());
    }

    // Step 2: ABC analysis
    if args.verbose {
        println!("\nStep 2: Ranking products by revenue");
    }
    let products = abc_analysis(&transactions)?;
    println!("✓ Ranked {} products", products.len());

    // Step 3: FRM analysis
    if args.verbose {
        println!("\nStep 3: Segmenting customers");
    }
    let customers = frm_analysis(&transactions)?;
    println!("✓ Segmented {} customers", customers.len());

    // Step 4: Assemble the report
    let bundle = AnalysisReport::assemble(&transactions, &products, &customers, args.top);
    print_report(&bundle, args);

    // Step 5: Render charts
    if !args.no_charts {
        if args.verbose {
            println!("\nStep 4: Generating charts");
            println!("  Output directory: {}", args.output);
        }
        let viz_start = Instant::now();
        viz::generate_chart_report(&bundle.charts, args.output_dir())?;
        println!("✓ Charts generated");
        if args.verbose {
            println!("  Rendering time: {:.2}s", viz_start.elapsed().as_secs_f64());
        }
    }

    // Step 6: Export the bundle for the presentation layer
    if let Some(path) = &args.export {
        let json = serde_json::to_string_pretty(&bundle)?;
        std::fs::write(path, json)?;
        println!("✓ Analysis bundle written to: {path}");
    }

    println!("\n=== Analysis Complete ===");
    println!(
        "Total processing time: {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Print tables, rollups, and insight lines to the console
fn print_report(bundle: &AnalysisReport, args: &Args) {
    println!("\n=== ABC Analysis ===");
    for t in &bundle.tiers {
        println!(
            "Category {}: {} products, ${:.2} ({:.1}% of revenue)",
            t.tier,
            t.products,
            t.revenue,
            t.revenue_share * 100.0
        );
    }

    println!("\nTop {} products by revenue:", args.top);
    for p in &bundle.top_products {
        println!("  {} - ${:.2} [{}]", p.item, p.total_revenue, p.tier);
    }
    println!(
        "Top 20% of products carry {:.1}% of revenue",
        bundle.top_quintile_revenue_share * 100.0
    );

    println!("\n=== Customer Segments ===");
    for s in &bundle.segments {
        println!("{}: {} customers", s.segment, s.customers);
    }

    if let Some(retention) = &bundle.retention {
        println!("\n=== Retention Metrics ===");
        println!(
            "Average recency: {:.1} days since last purchase",
            retention.avg_recency_days
        );
        println!("Average frequency: {:.2} purchases", retention.avg_frequency);
        println!(
            "Average spend per transaction: ${:.2}",
            retention.avg_spend_per_transaction
        );
    }

    println!("\n=== Insights ===");
    if let Some(peak) = report::peak_month(&bundle.monthly) {
        println!("Sales peaked in {} with ${:.2}", peak.label, peak.value);
    }
    if let Some(slow) = report::slowest_month(&bundle.monthly) {
        println!("The slowest month was {} with ${:.2}", slow.label, slow.value);
    }
    if let Some(busy) = report::busiest_weekday(&bundle.weekdays) {
        println!(
            "Most transactions occurred on {} ({} transactions)",
            busy.label, busy.value as u64
        );
    }
    if let Some(quiet) = report::quietest_weekday(&bundle.weekdays) {
        println!(
            "The quietest day was {} ({} transactions)",
            quiet.label, quiet.value as u64
        );
    }
    if let Some(top) = report::top_product(&bundle.products) {
        println!(
            "The top-performing product is {} with ${:.2} in revenue",
            top.label, top.value
        );
    }
    if let Some(least) = report::least_popular_product(&bundle.popularity) {
        println!(
            "The least popular product is {} with {} transactions",
            least.label, least.value as u64
        );
    }
}
