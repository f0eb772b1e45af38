use switchy::catalog::client::require_type;
use switchy::core::SwitchyResult;
use switchy::sdk::SdkInstaller;
use tokio_util::sync::CancellationToken;

pub async fn run(
    installer: &SdkInstaller,
    sdk_type: Option<String>,
    cancel: &CancellationToken,
) -> SwitchyResult<()> {
    match sdk_type {
        Some(sdk_type) => list_versions(installer, &sdk_type, cancel).await,
        None => list_types(installer, cancel).await,
    }
}

async fn list_types(installer: &SdkInstaller, cancel: &CancellationToken) -> SwitchyResult<()> {
    let catalog = installer.catalog().fetch(cancel).await?;

    if catalog.sdks.is_empty() {
        println!("No SDKs available.");
        return Ok(());
    }

    println!("Available SDKs:");
    for sdk in &catalog.sdks {
        match installer.active_version(&sdk.name)? {
            Some(active) => println!("  {} (using {})", sdk.name, active),
            None => println!("  {}", sdk.name),
        }
    }
    println!();
    println!("Run `switchy list <sdk>` to see its versions.");
    Ok(())
}

async fn list_versions(
    installer: &SdkInstaller,
    sdk_type: &str,
    cancel: &CancellationToken,
) -> SwitchyResult<()> {
    let catalog = installer.catalog().fetch(cancel).await?;
    let sdk = require_type(&catalog, sdk_type)?;

    let installed = installer.installed_versions(&sdk.name)?;
    let active = installer.active_version(&sdk.name)?;

    if sdk.versions.is_empty() {
        println!("No versions available for {}.", sdk.name);
        return Ok(());
    }

    println!("Versions for {}:", sdk.name);
    for version in &sdk.versions {
        let marker = if active.as_deref() == Some(version.version.as_str()) {
            "*"
        } else if installed.contains(&version.version) {
            "✓"
        } else {
            " "
        };
        let default = if sdk.default_version.as_deref() == Some(version.version.as_str()) {
            " (default)"
        } else {
            ""
        };
        match version.primary_link() {
            Some(link) => println!("  {} {}{} ({})", marker, version.version, default, link),
            None => println!("  {} {}{}", marker, version.version, default),
        }
    }
    println!();
    println!("* in use   ✓ installed");
    Ok(())
}
