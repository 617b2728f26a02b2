// DSM error code tables
//
// Every DSM API reports failures as a bare integer code. Codes below 400
// share one generic meaning across all APIs; codes from 400 up are
// reinterpreted per API family. Resolution always consults the generic
// table first, then the family table for the API that produced the code.

/// Placeholder reason for codes that no table knows about.
pub const UNKNOWN_REASON: &str = "Unknown";

/// API families with their own code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFamily {
    Auth,
    DownloadSearch,
    DownloadTask,
    FileStation,
    SurveillanceStation,
    Virtualization,
}

impl ApiFamily {
    /// Classify a dotted API identifier such as `SYNO.DownloadStation2.Task`.
    ///
    /// Matching is done on whole dot-separated segments, so
    /// `SYNO.FileStationX.List` does not resolve to [`ApiFamily::FileStation`].
    pub fn of(api: &str) -> Option<Self> {
        if api == crate::API_AUTH {
            return Some(Self::Auth);
        }

        let segments: Vec<&str> = api.split('.').collect();
        let has = |name: &str| segments.contains(&name);

        if has("DownloadStation") || has("DownloadStation2") {
            if has("BTSearch") {
                return Some(Self::DownloadSearch);
            }
            if has("Task") {
                return Some(Self::DownloadTask);
            }
            return None;
        }
        if has("FileStation") {
            return Some(Self::FileStation);
        }
        if has("SurveillanceStation") {
            return Some(Self::SurveillanceStation);
        }
        if has("Virtualization") {
            return Some(Self::Virtualization);
        }
        None
    }

    fn table(self) -> &'static [(i64, &'static str)] {
        match self {
            Self::Auth => AUTH,
            Self::DownloadSearch => DOWNLOAD_SEARCH,
            Self::DownloadTask => DOWNLOAD_TASK,
            Self::FileStation => FILE_STATION,
            Self::SurveillanceStation => SURVEILLANCE_STATION,
            Self::Virtualization => VIRTUALIZATION,
        }
    }
}

/// Resolve the human-readable reason for `code` returned by `api`.
///
/// `api` is `None` for failures that never reached an API (transport
/// errors), in which case only the generic table applies.
pub fn reason_for(api: Option<&str>, code: i64) -> &'static str {
    if let Some(reason) = lookup(COMMON, code) {
        return reason;
    }
    api.and_then(ApiFamily::of)
        .and_then(|family| lookup(family.table(), code))
        .unwrap_or(UNKNOWN_REASON)
}

fn lookup(table: &'static [(i64, &'static str)], code: i64) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, reason)| *reason)
}

// ── Tables ──────────────────────────────────────────────────────────

const COMMON: &[(i64, &str)] = &[
    (100, "Unknown"),
    (101, "Invalid parameters"),
    (102, "API does not exist"),
    (103, "API method does not exist"),
    (104, "This API version is not supported"),
    (105, "Insufficient user privilege"),
    (106, "Connection time out"),
    (107, "Multiple login detected"),
    (117, "Need manager rights for operation"),
    (119, "SID not found"),
];

const AUTH: &[(i64, &str)] = &[
    (400, "Invalid credentials"),
    (401, "Guest or disabled account"),
    (402, "Permission denied"),
    (403, "One time password not specified"),
    (404, "One time password authenticate failed"),
    (405, "App portal incorrect"),
    (406, "One time password code enforced"),
    (407, "Max Tries (if auto blocking is set to true)"),
    (408, "Password Expired Can not Change"),
    (409, "Password Expired"),
    (
        410,
        "Password must change (when first time use or after reset password by admin)",
    ),
    (411, "Account Locked (when account max try exceed)"),
];

const DOWNLOAD_SEARCH: &[(i64, &str)] = &[
    (400, "Unknown error"),
    (401, "Invalid parameter"),
    (402, "Parse user setting error"),
    (403, "Get category error"),
    (404, "Get search result from DB error"),
    (405, "Get user setting error"),
];

const DOWNLOAD_TASK: &[(i64, &str)] = &[
    (400, "File upload failed"),
    (401, "Max number of tasks reached"),
    (402, "Destination denied"),
    (403, "Destination does not exist"),
    (404, "Invalid task id"),
    (405, "Invalid task action"),
    (406, "No default destination"),
    (407, "Set destination failed"),
    (408, "File does not exist"),
];

const FILE_STATION: &[(i64, &str)] = &[
    (400, "Invalid parameter of file operation"),
    (401, "Unknown error of file operation"),
    (402, "System is too busy"),
    (403, "Invalid user does this file operation"),
    (404, "Invalid group does this file operation"),
    (405, "Invalid user and group does this file operation"),
    (406, "Can’t get user/group information from the account server"),
    (407, "Operation not permitted"),
    (408, "No such file or directory"),
    (409, "Non-supported file system"),
    (410, "Failed to connect internet-based file system (ex: CIFS)"),
    (411, "Read-only file system"),
    (412, "Filename too long in the non-encrypted file system"),
    (413, "Filename too long in the encrypted file system"),
    (414, "File already exists"),
    (415, "Disk quota exceeded"),
    (416, "No space left on device"),
    (417, "Input/output error"),
    (418, "Illegal name or path"),
    (419, "Illegal file name"),
    (420, "Illegal file name on FAT file system"),
    (421, "Device or resource busy"),
    (599, "No such task of the file operation"),
    (
        900,
        "Failed to delete file(s)/folder(s). More information in <errors> object",
    ),
    (
        1000,
        "Failed to copy files/folders. More information in <errors> object",
    ),
    (
        1001,
        "Failed to move files/folders. More information in <errors> object",
    ),
    (
        1002,
        "An error occurred at the destination. More information in <errors> object",
    ),
    (
        1003,
        "Cannot overwrite or skip the existing file because no overwrite parameter is given",
    ),
    (
        1004,
        "File cannot overwrite a folder with the same name, or folder cannot overwrite a file with the same name",
    ),
    (
        1006,
        "Cannot copy/move file/folder with special characters to a FAT32 file system",
    ),
    (
        1007,
        "Cannot copy/move a file bigger than 4G to a FAT32 file system",
    ),
    (
        1100,
        "Failed to create a folder. More information in <errors> object",
    ),
    (
        1101,
        "The number of folders to the parent folder would exceed the system limitation",
    ),
    (
        1200,
        "Failed to rename it. More information in <errors> object",
    ),
    (1300, "Failed to compress files/folders"),
    (
        1301,
        "Cannot create the archive because the given archive name is too long",
    ),
    (1400, "Failed to extract files"),
    (1401, "Cannot open the file as archive"),
    (1402, "Failed to read archive data error"),
    (1403, "Wrong password"),
    (1404, "Failed to get the file and dir list in an archive"),
    (1405, "Failed to find the item ID in an archive file"),
    (
        1800,
        "There is no Content-Length information in the HTTP header or the received size doesn’t match the value of Content-Length information in the HTTP header",
    ),
    (
        1801,
        "Wait too long, no date can be received from client (Default maximum wait time is 3600 seconds)",
    ),
    (1802, "No filename information in the last part of file content"),
    (1803, "Upload connection is cancelled"),
    (1804, "Failed to upload too big file to FAT file system"),
    (
        1805,
        "Can’t overwrite or skip the existed file, if no overwrite parameter is given",
    ),
    (2000, "Sharing link does not exist"),
    (
        2001,
        "Cannot generate sharing link because too many sharing links exist",
    ),
    (2002, "Failed to access sharing links"),
];

const SURVEILLANCE_STATION: &[(i64, &str)] = &[
    (400, "Execution failed"),
    (401, "Invalid parameter"),
    (402, "Camera disabled"),
    (403, "Insufficient license"),
    (404, "Codec activation failed"),
    (405, "CMS server connection failed"),
    (407, "CMS closed"),
    (410, "Service is not enabled"),
    (412, "Need to add license"),
    (413, "Reach the maximum of platform"),
    (414, "Some events not exist"),
    (415, "Message connect failed"),
    (417, "Test connection error"),
    (418, "Object/VisualStation ID does not exist"),
    (419, "VisualStation name repetition"),
    (439, "Too many items selected"),
];

const VIRTUALIZATION: &[(i64, &str)] = &[
    (400, "Unknown error"),
    (401, "Bad parameter"),
    (402, "Operation failed"),
    (403, "Name conflict"),
    (404, "The number of iSCSI LUNs has reached the system limit"),
    (
        500,
        "The cluster is frozen. More than half of the hosts are offline",
    ),
    (
        501,
        "The cluster is in the incompatible mode. Please upgrade to a compatible DSM version and try again",
    ),
    (600, "The cluster is not ready"),
    (601, "The host is offline"),
    (700, "The storage is in invalid"),
    (900, "Failed to set a host to a virtual machine"),
    (901, "The virtual machine does not have a host"),
    (
        902,
        "Failed to power on a virtual machine due to insufficient CPU threads",
    ),
    (
        903,
        "Failed to power on a virtual machine due to insufficient memory",
    ),
    (904, "The status of virtual machine is online"),
    (905, "MAC conflict"),
    (
        906,
        "Failed to create virtual machine because the selected image is not found",
    ),
    (907, "The status of virtual machine is offline"),
    (
        908,
        "Failed to power on a virtual machine due to insufficient CPU threads for reservation on the host",
    ),
    (
        909,
        "Failed to power on the virtual machine because there is no corresponding networking on the host",
    ),
    (
        910,
        "Only the VirtIO hard disk controller can be used to boot the virtual machine remotely",
    ),
    (911, "Cannot set vDSM license on virtual machine"),
    (1000, "Cannot find task_id"),
    (1001, "Need Virtual Machine Manager Pro"),
    (1400, "The result of image creating is partial success"),
    (
        1600,
        "The virtual machine has been successfully edited. However, errors occurred while reserving the memory or CPU on the HA hosts",
    ),
];
