// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{parse_vswhere_json, select_installations};
use std::path::PathBuf;

#[test]
fn test_parse_vswhere_json_empty() {
    assert!(parse_vswhere_json("[]").unwrap().is_empty());
}

#[test]
fn test_parse_vswhere_json_invalid() {
    assert!(parse_vswhere_json("not json").is_err());
}

#[test]
fn test_select_newest_complete_release() {
    let json = r#"[
        {
            "instanceId": "old",
            "installationPath": "C:\\VS2019",
            "displayName": "VS 2019",
            "installationVersion": "16.11.0.0"
        },
        {
            "instanceId": "nine",
            "installationPath": "C:\\VS2022-9",
            "displayName": "VS 2022 17.9",
            "installationVersion": "17.9.34728.123"
        },
        {
            "instanceId": "fourteen",
            "installationPath": "C:\\VS2022",
            "displayName": "VS 2022 17.14",
            "installationVersion": "17.14.36915.13"
        },
        {
            "instanceId": "preview",
            "installationPath": "C:\\VSPreview",
            "displayName": "VS Preview",
            "installationVersion": "18.0.0.0",
            "isPrerelease": true
        },
        {
            "instanceId": "broken",
            "installationPath": "C:\\VSBroken",
            "displayName": "VS Broken",
            "installationVersion": "17.20.0.0",
            "isComplete": false
        }
    ]"#;

    let ids: Vec<_> = select_installations(parse_vswhere_json(json).unwrap())
        .into_iter()
        .map(|vs| vs.instance_id)
        .collect();
    assert_eq!(ids, ["fourteen", "nine", "old"]);
}

#[test]
fn test_vc_dir() {
    let json = r#"[{
        "instanceId": "abc",
        "installationPath": "VS2022",
        "displayName": "VS",
        "installationVersion": "17.0"
    }]"#;
    let vs = parse_vswhere_json(json).unwrap().remove(0);
    assert_eq!(vs.vc_dir(), PathBuf::from("VS2022").join("VC"));
}
