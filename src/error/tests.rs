// isoenv-rs: Isomorphic environment tracking for bundlers
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ConfigError, IsoEnvError, IsoEnvResult, PassError, RewriteError};

#[test]
fn test_config_error_display() {
    let err = ConfigError::InvalidValue {
        section: "plugin".to_string(),
        key: "variable".to_string(),
        message: "not an identifier".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'variable' in section '[plugin]': not an identifier"
    );
}

#[test]
fn test_pass_error_display() {
    insta::assert_snapshot!(
        PassError::OutOfOrder { pass: 1, open: 2 }.to_string(),
        @"pass 1 finalized while pass 2 is open"
    );
    insta::assert_snapshot!(
        PassError::NotStarted { pass: 4 }.to_string(),
        @"pass 4 finalized but no pass is open"
    );
}

#[test]
fn test_boxed_conversion() {
    let err: IsoEnvError = RewriteError::OverlappingEdits {
        resource: "a.js".to_string(),
        first: 3,
        second: 5,
    }
    .into();
    assert!(matches!(err, IsoEnvError::Rewrite(_)));
    insta::assert_snapshot!(
        err.to_string(),
        @"rewrite error: overlapping edits at 3..5 in 'a.js'"
    );
}

#[test]
fn test_error_size() {
    let size = std::mem::size_of::<IsoEnvError>();
    assert!(size <= 16, "IsoEnvError is {size} bytes, expected <= 16");
}

#[test]
fn test_result_size() {
    let size = std::mem::size_of::<IsoEnvResult<()>>();
    assert!(size <= 16, "IsoEnvResult<()> is {size} bytes, expected <= 16");
}

#[test]
fn test_foreign_pass_display() {
    let err: IsoEnvError = PassError::ForeignPass { pass: 3 }.into();
    insta::assert_snapshot!(
        err.to_string(),
        @"pass error: pass 3 belongs to another tracker"
    );
}
