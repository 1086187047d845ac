//! Submission form construction.
//!
//! The device's add-user endpoint expects the exact field list its own UI
//! posts, duplicated fields included, so the payload is built as an ordered
//! list rather than a map. Field names and constants were captured from a
//! working browser session against the device UI.

use crate::types::UserPayload;

/// Build the ordered form body for the set-user submission.
///
/// `token` must be the token scraped from the add-user form — tokens are
/// single-use and the device rejects anything older. `entry_index` is the
/// slot the device assigned in that form; empty means let the device assign
/// one on submit.
///
/// The folder password pair is present only when the payload carries a
/// non-empty password; an empty password means "do not require a folder
/// password" and must be omitted, not sent as an empty field.
pub(crate) fn build_submission(
    user: &UserPayload,
    token: &str,
    entry_index: &str,
) -> Vec<(&'static str, String)> {
    let mut fields: Vec<(&'static str, String)> = vec![
        ("inputSpecifyModeIn", "WRITE".into()),
        ("listUpdateIn", "UPDATE".into()),
        ("wimToken", token.into()),
        ("mode", "ADDUSER".into()),
        ("pageSpecifiedIn", String::new()),
        ("pageNumberIn", String::new()),
        ("outputSpecifyModeIn", String::new()),
        ("inputSpecifyModeIn", String::new()),
        ("wayFrom", "adrsGetUser.cgi?outputSpecifyModeIn=SETTINGS".into()),
        ("wayTo", "adrsList.cgi".into()),
        ("isSelfPasswordEditMode", "false".into()),
        ("isLocalAuthPasswordUpdated", "false".into()),
        ("isFolderAuthPasswordUpdated", "false".into()),
        ("entryIndexIn", entry_index.into()),
        ("entryNameIn", user.display_name.clone()),
        ("entryDisplayNameIn", user.display_name.clone()),
        ("priorityIn", "5".into()),
        ("entryTagInfoIn", "1".into()),
        ("entryTagInfoIn", "1".into()),
        ("entryTagInfoIn", "1".into()),
        ("entryTagInfoIn", "1".into()),
        ("userCodeIn", user.user_code.clone()),
        ("smtpAuthAccountIn", "AUTH_SYSTEM_O".into()),
        ("folderAuthAccountIn", "AUTH_ASSIGNMENT_O".into()),
        ("folderAuthUserNameIn", user.folder_username.clone()),
        ("ldapAuthAccountIn", "AUTH_SYSTEM_O".into()),
    ];

    for func in user.functions.device_tokens() {
        fields.push(("availableFuncIn", func.into()));
    }

    fields.extend([
        ("entryUseIn", "ENTRYUSE_TO_O".to_string()),
        ("entryUseIn", "ENTRYUSE_FROM_O".to_string()),
        ("isCertificateExist", "false".to_string()),
        ("isEncryptAlways", "false".to_string()),
        ("folderProtocolIn", "SMB_O".to_string()),
        ("folderPathNameIn", user.smb_folder.path.clone()),
    ]);

    if !user.folder_password.is_empty() {
        fields.push(("folderAuthPasswordIn", user.folder_password.clone()));
        fields.push(("folderAuthPasswordConfirmIn", user.folder_password.clone()));
    }

    fields
}
