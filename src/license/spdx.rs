use std::sync::OnceLock;

use regex::Regex;

/// Signature phrases, checked in order against lowercased, whitespace-collapsed
/// license text. Families that contain another family's wording come first.
const SIGNATURES: &[(&str, &[&str])] = &[
    ("AGPL-3.0", &["gnu affero general public license", "version 3"]),
    ("LGPL-3.0", &["gnu lesser general public license", "version 3"]),
    ("LGPL-2.1", &["gnu lesser general public license", "version 2.1"]),
    ("LGPL-2.0", &["gnu library general public license", "version 2"]),
    ("GPL-3.0", &["gnu general public license", "version 3"]),
    ("GPL-2.0", &["gnu general public license", "version 2"]),
    ("MPL-2.0", &["mozilla public license", "2.0"]),
    ("Apache-2.0", &["apache license", "version 2.0"]),
    ("CDDL-1.0", &["common development and distribution license", "version 1.0"]),
    ("EPL-2.0", &["eclipse public license", "v 2.0"]),
    ("EPL-1.0", &["eclipse public license", "v 1.0"]),
    (
        "Unlicense",
        &["this is free and unencumbered software released into the public domain"],
    ),
    (
        "ISC",
        &["permission to use, copy, modify, and/or distribute this software for any purpose"],
    ),
    (
        "MIT",
        &["permission is hereby granted, free of charge, to any person obtaining a copy"],
    ),
    (
        "BSD-3-Clause",
        &["redistribution and use in source and binary forms", "neither the name"],
    ),
    (
        "BSD-3-Clause",
        &["redistribution and use in source and binary forms", "may be used to endorse or promote"],
    ),
    ("BSD-2-Clause", &["redistribution and use in source and binary forms"]),
];

fn spdx_tag() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r"(?m)SPDX-License-Identifier:(.*)$")
            .expect("SPDX tag pattern is valid")
    })
}

fn whitespace() -> &'static Regex {
    static WS: OnceLock<Regex> = OnceLock::new();
    WS.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Recognize a license text, returning its SPDX-style identifier.
///
/// An explicit `SPDX-License-Identifier:` tag wins and is returned verbatim,
/// compound expressions included, so `MIT AND GPL-3.0` is never mistaken for
/// plain `MIT`. Otherwise the text is matched against well-known signature
/// phrases.
pub fn recognize(text: &str) -> Option<&str> {
    let tagged = spdx_tag()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|expr| !expr.is_empty());
    if tagged.is_some() {
        return tagged;
    }

    let lower = text.to_lowercase();
    let collapsed = whitespace().replace_all(&lower, " ");

    SIGNATURES
        .iter()
        .find(|(_, phrases)| phrases.iter().all(|p| collapsed.contains(p)))
        .map(|(id, _)| *id)
}
