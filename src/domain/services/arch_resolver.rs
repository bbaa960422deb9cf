//! Architecture Resolver
//!
//! Queries a device for its primary ABI and decides which architecture to
//! deploy for, taking operator overrides and fallbacks into account.

use crate::domain::ports::Bridge;
use crate::domain::services::shell;
use crate::domain::value_objects::Architecture;
use crate::error::{DeployError, DeployResult, DeployStep};

/// ABI as reported by the device, plus its canonical tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArchitecture {
    pub abi: String,
    pub detected: Architecture,
}

/// Architecture chosen for deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitectureChoice {
    pub arch: Architecture,
    /// Set when the choice differs from what the device reported
    pub warning: Option<String>,
}

/// Read `ro.product.cpu.abi` and map it
pub fn resolve<B: Bridge + ?Sized>(bridge: &B, serial: &str) -> DeployResult<ResolvedArchitecture> {
    let result = bridge
        .shell(serial, shell::GET_ABI)
        .map_err(|e| e.at_step(DeployStep::Architecture))?;
    if !result.success() {
        return Err(DeployError::DeviceUnreachable {
            serial: serial.to_string(),
            step: DeployStep::Architecture,
            detail: format!("getprop failed ({})", result.describe()),
        });
    }
    let abi = result.first_line().unwrap_or_default().to_string();
    let detected = Architecture::from_abi(&abi);
    log::debug!("{}: abi '{}' -> {}", serial, abi, detected);
    Ok(ResolvedArchitecture { abi, detected })
}

/// Pick the architecture to deploy.
///
/// An explicit override always wins (warning on mismatch with a known
/// detection). Otherwise the detected tag, else the configured fallback,
/// else `UnsupportedArchitecture`.
pub fn choose(
    serial: &str,
    resolved: &ResolvedArchitecture,
    override_arch: Option<Architecture>,
    fallback: Option<Architecture>,
) -> DeployResult<ArchitectureChoice> {
    if let Some(arch) = override_arch.filter(|a| a.is_known()) {
        let warning = (resolved.detected.is_known() && resolved.detected != arch).then(|| {
            format!(
                "device reports {} ({}), deploying {} as requested",
                resolved.detected, resolved.abi, arch
            )
        });
        return Ok(ArchitectureChoice { arch, warning });
    }

    if resolved.detected.is_known() {
        return Ok(ArchitectureChoice {
            arch: resolved.detected,
            warning: None,
        });
    }

    match fallback.filter(|a| a.is_known()) {
        Some(arch) => Ok(ArchitectureChoice {
            arch,
            warning: Some(format!(
                "unrecognised ABI '{}', using fallback {}",
                resolved.abi, arch
            )),
        }),
        None => Err(DeployError::UnsupportedArchitecture {
            serial: serial.to_string(),
            abi: resolved.abi.clone(),
        }),
    }
}
