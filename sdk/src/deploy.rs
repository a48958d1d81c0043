//! Standing up a configured gateway on an in-memory host

use crate::client::{GatewayClient, PolicyClient};
use crate::config::{DeploymentConfig, MethodRule, PolicyConfig, PredicateRef};
use crate::{SdkError, SdkResult};
use relaygate_common::{Address, Selector};
use relaygate_gateway::{Gateway, PolicySource};
use relaygate_runtime::Host;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Which whitelist admitted a (destination, selector) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationPath {
    Target,
    Method,
}

/// Authorization outcome for one (destination, selector) pair, as the
/// gateway would see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub path: Option<AuthorizationPath>,
    /// Predicate the gateway would consult; always `None` on the target path
    pub predicate: Option<Address>,
}

impl Decision {
    pub fn is_authorized(&self) -> bool {
        self.path.is_some()
    }
}

/// A gateway, its policy store and any named predicates living on one host.
#[derive(Debug)]
pub struct Deployment {
    pub host: Host,
    pub gateway: GatewayClient,
    pub policy: PolicyClient,
    pub predicates: BTreeMap<String, Address>,
}

impl Deployment {
    /// Deploy onto a fresh host built from `config.host`.
    ///
    /// A fresh host holds no policy store, so an `attach` policy source
    /// fails here; use [`Deployment::deploy_on`] with a host that has one.
    pub fn deploy(config: &DeploymentConfig, deployer: Address) -> SdkResult<Self> {
        let host = Host::new(config.host.clone())?;
        Self::deploy_on(host, config, deployer)
    }

    /// Deploy predicates and the gateway from `deployer`, then replay the
    /// policy section as the store owner.
    pub fn deploy_on(mut host: Host, config: &DeploymentConfig, deployer: Address) -> SdkResult<Self> {
        if let PolicySource::Attach(store) = config.gateway.policy {
            if !host.has_code(&store) {
                return Err(SdkError::invalid_configuration(format!(
                    "policy store {store} has no code on this host"
                )));
            }
        }

        let mut predicates = BTreeMap::new();
        for (name, predicate) in &config.predicates {
            let address = host.deploy_shared(deployer, predicate.clone().into_contract())?;
            debug!(%name, %address, "predicate deployed");
            predicates.insert(name.clone(), address);
        }

        let gateway = GatewayClient::new(host.deploy(deployer, Gateway::new(config.gateway))?);
        let policy = PolicyClient::new(gateway.policy(&host)?);
        info!(gateway = %gateway.address(), policy = %policy.address(), "gateway deployed");

        let mut deployment = Self {
            host,
            gateway,
            policy,
            predicates,
        };
        deployment.apply_policy(&config.policy)?;
        Ok(deployment)
    }

    pub fn resolve_predicate(&self, predicate: &PredicateRef) -> SdkResult<Address> {
        match predicate {
            PredicateRef::Address(address) => Ok(*address),
            PredicateRef::Named(name) => self
                .predicates
                .get(name)
                .copied()
                .ok_or_else(|| SdkError::UnknownPredicate(name.clone())),
        }
    }

    /// Replay `policy` as owner transactions. Returns the number of
    /// transactions sent.
    ///
    /// Stops at the first failure; earlier entries stay applied.
    pub fn apply_policy(&mut self, policy: &PolicyConfig) -> SdkResult<usize> {
        let owner = self.policy.owner(&self.host)?;
        let mut sent = 0;

        for target in &policy.targets {
            self.policy.set_target_status(&mut self.host, owner, *target, true)?;
            sent += 1;
        }
        for rule in &policy.methods {
            sent += self.apply_rule(owner, rule)?;
        }

        info!(transactions = sent, "policy applied");
        Ok(sent)
    }

    fn apply_rule(&mut self, owner: Address, rule: &MethodRule) -> SdkResult<usize> {
        let selector = rule.method.selector();
        // Resolve before sending anything so an unknown name fails cleanly
        let predicate = rule
            .predicate
            .as_ref()
            .map(|predicate| self.resolve_predicate(predicate))
            .transpose()?;

        self.policy
            .set_method_status(&mut self.host, owner, rule.target, selector, rule.allowed)?;
        let Some(predicate) = predicate else {
            return Ok(1);
        };
        self.policy
            .set_predicate(&mut self.host, owner, rule.target, selector, predicate)?;
        Ok(2)
    }

    /// How the gateway would authorize `selector` on `target`.
    pub fn decision(&self, target: Address, selector: Selector) -> SdkResult<Decision> {
        if self.policy.allowed_target(&self.host, target)? {
            return Ok(Decision {
                path: Some(AuthorizationPath::Target),
                predicate: None,
            });
        }
        if !self.policy.allowed_method(&self.host, target, selector)? {
            return Ok(Decision {
                path: None,
                predicate: None,
            });
        }
        Ok(Decision {
            path: Some(AuthorizationPath::Method),
            predicate: self.policy.predicate_for(&self.host, target, selector)?,
        })
    }
}
