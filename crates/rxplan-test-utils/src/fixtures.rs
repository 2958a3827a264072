// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference CSV fixtures.

/// Locations the harness registers its sources under.
pub const PARTD_LOCATION: &str = "mock://partd.csv";
pub const MEDICAID_LOCATION: &str = "mock://medicaid.csv";

/// Part D crosswalk shaped like the CMS file: extra columns, mixed case,
/// one row with no PCN.
pub const PARTD_CSV: &str = "\
CONTRACT_ID,PLAN_NAME,BIN,PCN,GROUP
H1234,Acme Advantage,004336,MEDDADV,RX1234
S5678,Prime Part D,610097,medd prime,
H9999,Orphan Plan,015581,,
S4321,Shared BIN Plan,610502,MEDDCVS,
";

/// State Medicaid master list.
pub const MEDICAID_CSV: &str = "\
STATE,BIN,PCN,PLAN
NY,610494,MCDNY,NY Medicaid FFS
OH,004336,MCDOH,Ohio Medicaid
CA,600428,MEDICAIDCA,Medi-Cal
";

/// A body that fetches fine but is not a reference CSV.
pub const NOT_A_CSV: &str = "<html><body>Service Unavailable</body></html>";
