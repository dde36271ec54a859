// Copyright 2024 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

//! Classification of a certificate chain into trust anchors and adjunct
//! certificates.

use std::collections::HashSet;

use pades_crypto::certificate::{find_issuer, CertificateInfo};

use crate::{Error, Result};

/// Certificates accepted as roots of verification.
///
/// Every member is self-signed.
#[derive(Clone, Debug, Default)]
pub struct TrustAnchorSet {
    anchors: Vec<CertificateInfo>,
}

impl TrustAnchorSet {
    /// Iterate over the anchors in chain order.
    pub fn iter(&self) -> impl Iterator<Item = &CertificateInfo> {
        self.anchors.iter()
    }

    /// Returns `true` if `cert` is one of the anchors.
    pub fn contains(&self, cert: &CertificateInfo) -> bool {
        self.anchors.iter().any(|a| a.der == cert.der)
    }

    /// Number of anchors.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Returns `true` if there are no anchors.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

/// Every certificate of the chain, available for path building.
///
/// Anchors are members too. Use [`AdjunctSet::adjunct_only`] for the
/// certificates that are not self-signed; those are the ones subject to
/// revocation checks.
#[derive(Clone, Debug, Default)]
pub struct AdjunctSet {
    certs: Vec<CertificateInfo>,
}

impl AdjunctSet {
    /// Iterate over all members in chain order, leaf first.
    pub fn iter(&self) -> impl Iterator<Item = &CertificateInfo> {
        self.certs.iter()
    }

    /// Iterate over the members that are not self-signed.
    pub fn adjunct_only(&self) -> impl Iterator<Item = &CertificateInfo> {
        self.certs.iter().filter(|c| !c.self_signed)
    }

    /// The signing certificate.
    pub fn leaf(&self) -> Option<&CertificateInfo> {
        self.certs.first()
    }

    /// The member that issued `cert`, if present.
    pub fn issuer_of(&self, cert: &CertificateInfo) -> Option<&CertificateInfo> {
        find_issuer(cert, &self.certs)
    }

    /// DER encodings of all members, leaf first.
    pub fn to_der_chain(&self) -> Vec<Vec<u8>> {
        self.certs.iter().map(|c| c.der.clone()).collect()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.certs.len()
    }

    /// Returns `true` if there are no members.
    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }
}

/// Split `chain` into trust anchors and adjunct certificates.
///
/// A certificate is an anchor if its issuer equals its subject and its
/// signature verifies against its own key. Every certificate, anchor or
/// not, is a member of the adjunct set. Duplicates (same DER) are kept
/// once.
///
/// Fails with [`Error::InvalidChain`] if `chain` is empty or any member
/// cannot be parsed.
pub fn classify_chain(chain: &[Vec<u8>]) -> Result<(TrustAnchorSet, AdjunctSet)> {
    if chain.is_empty() {
        return Err(Error::InvalidChain("certificate chain is empty".to_string()));
    }

    let mut seen = HashSet::new();
    let mut anchors = Vec::new();
    let mut certs = Vec::new();

    for der in chain {
        let cert = CertificateInfo::from_der(der)?;

        if !seen.insert(cert.fingerprint()) {
            continue;
        }

        if cert.self_signed {
            anchors.push(cert.clone());
        }
        certs.push(cert);
    }

    log::debug!(
        "classified chain: {} trust anchor(s), {} certificate(s)",
        anchors.len(),
        certs.len()
    );

    Ok((TrustAnchorSet { anchors }, AdjunctSet { certs }))
}
