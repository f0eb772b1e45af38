use crate::cli::progress::DownloadBar;
use switchy::core::SwitchyResult;
use switchy::sdk::SdkInstaller;
use tokio_util::sync::CancellationToken;

pub async fn run(
    installer: &SdkInstaller,
    sdk_type: &str,
    version: &str,
    cancel: &CancellationToken,
) -> SwitchyResult<()> {
    let bar = DownloadBar::new(&format!("{} {}", sdk_type, version));
    let activated = installer
        .use_version(sdk_type, version, Some(&bar), cancel)
        .await?;

    if activated.installed_now {
        println!("✓ Installed {} {}", activated.sdk_type, activated.version);
    }
    println!(
        "✓ Now using {} {} ({})",
        activated.sdk_type,
        activated.version,
        activated.active_dir.display()
    );
    Ok(())
}
