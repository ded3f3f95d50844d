//! Audit certificate derivation and export.
//!
//! A certificate is a point-in-time snapshot of (devices, checklist, log):
//! everything except its id and generation timestamp is a deterministic
//! function of the inputs, so rebuilding from the same inputs yields
//! byte-identical device and checklist sections. Export renders the JSON
//! exactly once; the file writers and the clipboard path all read that one
//! string, which is what guarantees identical output across channels.

use crate::logbook::{LogBook, DELETED_FILE_TAG};
use crate::verification::Checklist;
use crate::{ConsoleResult, Device, DeviceCategory};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

/// Stand-in manifest entry when no file-deletion notices were logged, so
/// the absence is visually explicit in exports.
pub const NO_FILES_PLACEHOLDER: &str = "No file manifest recorded";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub certificate_id: String,
    pub generated_at: DateTime<Utc>,
    pub operation_label: String,
    pub devices: Vec<CertifiedDevice>,
    pub checklist_summary: BTreeMap<String, String>,
    pub compliance: ComplianceMeta,
    pub operator: String,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertifiedDevice {
    pub identifier: String,
    pub name: String,
    pub method: String,
    pub verification_status: String,
    pub deleted_files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceMeta {
    pub standard: String,
    pub nist_guidelines: String,
    pub certification_level: String,
}

impl Default for ComplianceMeta {
    fn default() -> Self {
        Self {
            standard: "DoD 5220.22-M".to_string(),
            nist_guidelines: "SP 800-88 Rev. 1".to_string(),
            certification_level: "CONFIDENTIAL".to_string(),
        }
    }
}

/// Builds certificates from the state an operation left behind.
pub struct CertificateBuilder {
    operation_label: String,
    operator: String,
    compliance: ComplianceMeta,
}

impl Default for CertificateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificateBuilder {
    pub fn new() -> Self {
        Self {
            operation_label: "Secure Wipe - DoD 5220.22-M Standard".to_string(),
            operator: "SecureWipe Pro Demo User".to_string(),
            compliance: ComplianceMeta::default(),
        }
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    pub fn with_operation_label(mut self, label: impl Into<String>) -> Self {
        self.operation_label = label.into();
        self
    }

    pub fn with_compliance(mut self, compliance: ComplianceMeta) -> Self {
        self.compliance = compliance;
        self
    }

    /// Derive a certificate from the supplied devices, the checklist
    /// outcome, and the aggregated log.
    ///
    /// File-deletion evidence is attributed to `target_device_id` (the
    /// device the operation actually ran against); every other device, and
    /// the target when no notices exist, carries the fixed placeholder.
    pub fn build(
        &self,
        devices: &[Device],
        checklist: &Checklist,
        logbook: &LogBook,
        target_device_id: Option<&str>,
    ) -> Result<Certificate> {
        let deleted_files: Vec<String> = logbook
            .tagged(DELETED_FILE_TAG)
            .map(str::to_owned)
            .collect();

        let status = if checklist.all_passed() {
            "PASSED"
        } else {
            "FAILED"
        };

        let certified = devices
            .iter()
            .map(|device| {
                let files = if Some(device.id.as_str()) == target_device_id
                    && !deleted_files.is_empty()
                {
                    deleted_files.clone()
                } else {
                    vec![NO_FILES_PLACEHOLDER.to_string()]
                };
                CertifiedDevice {
                    identifier: device.id.clone(),
                    name: device.name.clone(),
                    method: wipe_method(device.category).to_string(),
                    verification_status: status.to_string(),
                    deleted_files: files,
                }
            })
            .collect();

        let checklist_summary = checklist
            .items()
            .iter()
            .map(|item| (item.label.clone(), item.status.summary_token().to_string()))
            .collect();

        let mut certificate = Certificate {
            certificate_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            operation_label: self.operation_label.clone(),
            devices: certified,
            checklist_summary,
            compliance: self.compliance.clone(),
            operator: self.operator.clone(),
            signature: String::new(),
        };
        certificate.signature = sign(&certificate)?;

        Ok(certificate)
    }
}

fn wipe_method(category: DeviceCategory) -> &'static str {
    match category {
        DeviceCategory::Mobile => "Cryptographic erase",
        DeviceCategory::Drive | DeviceCategory::Removable | DeviceCategory::Host => {
            "3-pass overwrite"
        }
    }
}

/// Signature placeholder: SHA-256 over the certificate serialized with the
/// signature field blanked.
fn sign(certificate: &Certificate) -> Result<String> {
    let mut payload = certificate.clone();
    payload.signature = String::new();

    let json = serde_json::to_string(&payload)?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());

    Ok(format!("SHA256:{:x}", hasher.finalize()))
}

impl Certificate {
    /// Render the export value. The JSON string is produced here, once;
    /// every export channel reads it from the returned value.
    pub fn export(&self) -> Result<CertificateExport> {
        Ok(CertificateExport {
            certificate_id: self.certificate_id.clone(),
            json: serde_json::to_string_pretty(self)?,
        })
    }
}

/// One rendered certificate, shared by every export channel.
#[derive(Debug, Clone)]
pub struct CertificateExport {
    certificate_id: String,
    json: String,
}

/// Destination for the clipboard-copy path. The real sink lives in the
/// presentation layer; the core only guarantees what text it receives.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> ConsoleResult<()>;
}

impl CertificateExport {
    pub fn certificate_id(&self) -> &str {
        &self.certificate_id
    }

    /// The canonical JSON payload (stable key order, 2-space indent).
    pub fn json(&self) -> &str {
        &self.json
    }

    /// Plain-text wrapper embedding the same JSON payload.
    pub fn text(&self) -> String {
        format!("Certificate of Secure Wipe\n\n{}", self.json)
    }

    /// Exactly the bytes the clipboard receives: the same JSON payload.
    pub fn clipboard_payload(&self) -> &str {
        &self.json
    }

    pub fn file_stem(&self) -> String {
        format!("secure-wipe-certificate-{}", self.certificate_id)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.json)?;
        Ok(())
    }

    pub fn save_text(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.text())?;
        Ok(())
    }

    /// Copy the payload into a clipboard sink. Failures are reported only
    /// on the diagnostic channel, never the audit log, and never block.
    pub fn copy_to(&self, sink: &mut dyn ClipboardSink) -> bool {
        match sink.set_text(self.clipboard_payload()) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(error = %error, certificate_id = %self.certificate_id, "clipboard copy failed");
                false
            }
        }
    }
}
