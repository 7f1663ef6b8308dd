use crate::core::PipelineConfig;
use crate::services::ConfigPreset;

/// Execute presets command
pub fn execute_presets() {
    println!("📋 Available presets:");
    for preset in ConfigPreset::ALL {
        let config = preset.build();
        println!("   {:<16} {}", preset.name(), preset.description());
        println!(
            "   {:<16} workers={} fetch_timeout={:?} queue_capacity={} progress={}",
            "",
            config.worker_count(),
            config.fetch_timeout(),
            config
                .queue_capacity()
                .map_or_else(|| "auto".to_string(), |c| c.to_string()),
            config.enable_progress_reporting(),
        );
    }
}
