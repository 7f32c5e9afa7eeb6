//! Human-readable rendering of build summaries and target lists.

use std::fmt::Write;

use gobuilder_core::{supported_targets, BuildRequest, BuildSummary};

/// Render the text report for a finished build.
pub fn render_summary(request: &BuildRequest, summary: &BuildSummary) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "🚀 Cross-platform build finished\n");
    let _ = writeln!(out, "📁 Source:      {}", request.source_file.display());
    let _ = writeln!(out, "📦 App name:    {}", request.app_name);
    let _ = writeln!(out, "📂 Output dir:  {}", summary.output_dir.display());
    let _ = writeln!(out, "⚡ Parallel jobs: {}\n", request.jobs);

    if !summary.built_targets.is_empty() {
        let _ = writeln!(out, "✅ Built:");
        for target in &summary.built_targets {
            let _ = writeln!(out, "  • {}", target);
        }
    }

    if !summary.failed_targets.is_empty() {
        let _ = writeln!(out, "\n❌ Failed:");
        for target in &summary.failed_targets {
            let _ = writeln!(out, "  • {}", target);
        }
    }

    if summary.success {
        let _ = writeln!(
            out,
            "\n🎉 All targets built successfully! {} in total",
            summary.built_targets.len()
        );
    } else {
        let _ = writeln!(
            out,
            "\n⚠️ Some builds failed. Succeeded: {}, failed: {}",
            summary.built_targets.len(),
            summary.failed_targets.len()
        );
        if summary.cancelled > 0 {
            let _ = writeln!(out, "   ({} cancelled)", summary.cancelled);
        }
    }

    out
}

/// Render the markdown table printed by `list-targets`.
pub fn render_targets() -> String {
    let mut out = String::new();

    let _ = writeln!(out, "🎯 Supported build targets:\n");
    let _ = writeln!(out, "| Platform | GOOS | GOARCH | Target flag |");
    let _ = writeln!(out, "|----------|------|--------|-------------|");
    for t in supported_targets() {
        let _ = writeln!(
            out,
            "| {} | {} | {} | --target {}/{} |",
            t.name, t.goos, t.goarch, t.goos, t.goarch
        );
    }

    let _ = writeln!(out, "\n💡 Tips:");
    let _ = writeln!(out, "• Use `gobuilder build --target <goos>/<goarch>` for a custom build");
    let _ = writeln!(out, "• Use `gobuilder quick-build` to build Linux x64 and Windows x64");

    out
}
