//! User configuration records pushed onto devices.
//!
//! These are the plain records the management layer hands over for one
//! provisioning batch. The folder password arrives already decrypted and is
//! used exactly once, in the single form submission that carries it.

use serde::{Deserialize, Serialize};

/// The per-user access configuration provisioned onto a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    /// Name shown on the device panel and in its address book.
    pub display_name: String,
    /// Numeric login code the user types at the device.
    pub user_code: String,
    /// Username for the user's network scan folder.
    #[serde(default)]
    pub folder_username: String,
    /// Password for the network folder. Empty means "do not set a folder
    /// password" and is omitted from the submission entirely.
    #[serde(default)]
    pub folder_password: String,
    /// Device functions this user may use.
    pub functions: FunctionSet,
    /// Destination folder for scans.
    pub smb_folder: SmbFolder,
}

/// Which device functions a user is allowed to use.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionSet {
    pub copier: bool,
    pub scanner: bool,
    pub printer: bool,
    pub document_server: bool,
    pub fax: bool,
    pub browser: bool,
}

impl FunctionSet {
    /// Translate enabled functions into the tokens the device UI expects,
    /// in the order its own form emits them.
    pub fn device_tokens(&self) -> Vec<&'static str> {
        let mut tokens = Vec::new();
        if self.copier {
            tokens.push("COPY");
        }
        if self.scanner {
            tokens.push("SCAN");
        }
        if self.printer {
            tokens.push("PRT");
        }
        if self.document_server {
            tokens.push("DOC_SERVER");
        }
        if self.fax {
            tokens.push("FAX");
        }
        if self.browser {
            tokens.push("BROWSER");
        }
        tokens
    }
}

/// SMB folder descriptor for the user's scan destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmbFolder {
    pub server: String,
    #[serde(default = "SmbFolder::default_port")]
    pub port: u16,
    /// UNC path, e.g. `\\fileserver\scans\jdoe`.
    pub path: String,
}

impl SmbFolder {
    fn default_port() -> u16 {
        445
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_tokens_order() {
        let functions = FunctionSet {
            copier: true,
            scanner: true,
            printer: true,
            document_server: false,
            fax: false,
            browser: true,
        };
        assert_eq!(functions.device_tokens(), vec!["COPY", "SCAN", "PRT", "BROWSER"]);
    }

    #[test]
    fn test_device_tokens_empty() {
        assert!(FunctionSet::default().device_tokens().is_empty());
    }

    #[test]
    fn test_payload_deserialize_defaults() {
        let json = r#"{
            "display_name": "Jane Doe",
            "user_code": "54321",
            "functions": { "copier": true, "printer": true },
            "smb_folder": { "server": "files.corp", "path": "\\\\files.corp\\scans\\jdoe" }
        }"#;
        let payload: UserPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.folder_password, "");
        assert_eq!(payload.smb_folder.port, 445);
        assert!(payload.functions.copier);
        assert!(!payload.functions.fax);
    }
}
