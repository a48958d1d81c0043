use relaygate_policy::PolicyStore;
use relaygate_sdk::{
    Address, AuthorizationPath, Deployment, DeploymentConfig, Host, PolicyConfig, PolicySource,
    SdkError, Selector, StockPredicate, TargetAuthority,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn sample_json(owner: Address, vault: Address, token: Address) -> String {
    format!(
        r#"{{
            "host": {{ "max_call_depth": 32 }},
            "gateway": {{
                "initial_target": "{vault}",
                "owner": "{owner}",
                "target_authority": "owner",
                "policy": {{ "deploy": {{ "owner": "{owner}" }} }}
            }},
            "predicates": {{
                "even": {{ "kind": "accept_even" }},
                "small": {{ "kind": "uint_ceiling", "max": 1000 }}
            }},
            "policy": {{
                "targets": ["{token}"],
                "methods": [
                    {{ "target": "{vault}", "method": "deposit(uint256)", "predicate": "small" }},
                    {{ "target": "{vault}", "method": "receive" }},
                    {{ "target": "{vault}", "method": "0xdeadbeef", "allowed": false, "predicate": "even" }}
                ]
            }}
        }}"#
    )
}

#[test]
fn test_load_and_deploy_from_file() {
    let owner = Address::from_label("owner");
    let vault = Address::from_label("vault");
    let token = Address::from_label("token");
    let file = write_config(&sample_json(owner, vault, token));

    let config = DeploymentConfig::load(file.path()).unwrap();
    assert_eq!(config.host.max_call_depth, 32);
    assert_eq!(config.gateway.target_authority, TargetAuthority::Owner);
    assert_eq!(config.gateway.policy, PolicySource::Deploy { owner });
    assert_eq!(config.predicates["small"], StockPredicate::UintCeiling { max: 1000 });

    let deployment = Deployment::deploy(&config, Address::from_label("deployer")).unwrap();
    let host = &deployment.host;
    assert_eq!(host.config().max_call_depth, 32);
    assert_eq!(deployment.gateway.target(host).unwrap(), vault);
    assert_eq!(deployment.gateway.owner(host).unwrap(), owner);
    assert_eq!(deployment.policy.owner(host).unwrap(), owner);

    // Target whitelist
    let decision = deployment
        .decision(token, Selector::from_signature("anything()"))
        .unwrap();
    assert_eq!(decision.path, Some(AuthorizationPath::Target));
    assert_eq!(decision.predicate, None);

    // Method whitelist with a named predicate
    let deposit = Selector::from_signature("deposit(uint256)");
    let decision = deployment.decision(vault, deposit).unwrap();
    assert_eq!(decision.path, Some(AuthorizationPath::Method));
    assert_eq!(decision.predicate, Some(deployment.predicates["small"]));

    let decision = deployment.decision(vault, Selector::RECEIVE).unwrap();
    assert!(decision.is_authorized());
    assert_eq!(decision.predicate, None);

    // Listed as disallowed: binding is stored but the pair is refused
    let dead = Selector::new([0xde, 0xad, 0xbe, 0xef]);
    assert!(!deployment.decision(vault, dead).unwrap().is_authorized());
    assert_eq!(
        deployment.policy.predicate_for(host, vault, dead).unwrap(),
        Some(deployment.predicates["even"])
    );
}

#[test]
fn test_apply_policy_counts_transactions() {
    let owner = Address::from_label("owner");
    let vault = Address::from_label("vault");
    let token = Address::from_label("token");
    let config = DeploymentConfig::from_json(&sample_json(owner, vault, token)).unwrap();
    let mut deployment = Deployment::deploy(&config, owner).unwrap();

    // Replaying is idempotent on storage
    let policy = deployment.policy.address();
    let before = deployment.host.storage(&policy);
    let sent = deployment.apply_policy(&config.policy).unwrap();
    assert_eq!(sent, 6);
    assert_eq!(deployment.host.storage(&policy), before);

    assert_eq!(deployment.apply_policy(&PolicyConfig::default()).unwrap(), 0);
}

#[test]
fn test_unknown_predicate_name_is_reported() {
    let owner = Address::from_label("owner");
    let vault = Address::from_label("vault");
    let json = format!(
        r#"{{
            "gateway": {{ "owner": "{owner}", "policy": {{ "deploy": {{ "owner": "{owner}" }} }} }},
            "policy": {{ "methods": [{{ "target": "{vault}", "method": "foo(uint256)", "predicate": "missing" }}] }}
        }}"#
    );
    let config = DeploymentConfig::from_json(&json).unwrap();
    let err = Deployment::deploy(&config, owner).unwrap_err();
    assert!(matches!(err, SdkError::UnknownPredicate(name) if name == "missing"));
}

#[test]
fn test_bad_files() {
    let missing = DeploymentConfig::load("/definitely/not/here.json").unwrap_err();
    assert!(matches!(missing, SdkError::Io(_)));

    let file = write_config("{ not json");
    assert!(matches!(DeploymentConfig::load(file.path()), Err(SdkError::Json(_))));

    let owner = Address::from_label("owner");
    let file = write_config(&format!(
        r#"{{ "gateway": {{ "owner": "{owner}", "policy": {{ "deploy": {{ "owner": "{owner}" }} }} }},
             "policy": {{ "methods": [{{ "target": "{owner}", "method": "0x12" }}] }} }}"#
    ));
    assert!(matches!(DeploymentConfig::load(file.path()), Err(SdkError::Json(_))));

    // A zero call depth is refused when the host is built
    let config = DeploymentConfig::from_json(&format!(
        r#"{{ "host": {{ "max_call_depth": 0 }},
             "gateway": {{ "owner": "{owner}", "policy": {{ "deploy": {{ "owner": "{owner}" }} }} }} }}"#
    ))
    .unwrap();
    assert!(matches!(Deployment::deploy(&config, owner), Err(SdkError::Host(_))));
}

fn attach_json(owner: Address, store: Address, token: Address) -> String {
    format!(
        r#"{{
            "gateway": {{ "owner": "{owner}", "policy": {{ "attach": "{store}" }} }},
            "policy": {{ "targets": ["{token}"] }}
        }}"#
    )
}

#[test]
fn test_attach_needs_an_existing_store() {
    let owner = Address::from_label("owner");
    let store = Address::from_label("store");
    let config =
        DeploymentConfig::from_json(&attach_json(owner, store, Address::from_label("token")))
            .unwrap();
    assert_eq!(config.gateway.policy, PolicySource::Attach(store));

    // A fresh host has nothing at the store address
    let err = Deployment::deploy(&config, owner).unwrap_err();
    assert!(matches!(err, SdkError::InvalidConfiguration(_)), "{err}");
}

#[test]
fn test_attach_onto_host_with_store() {
    let owner = Address::from_label("owner");
    let token = Address::from_label("token");
    let mut host = Host::default();
    let store = host.deploy(owner, PolicyStore::new(owner)).unwrap();

    let config = DeploymentConfig::from_json(&attach_json(owner, store, token)).unwrap();
    let deployment = Deployment::deploy_on(host, &config, owner).unwrap();
    assert_eq!(deployment.policy.address(), store);
    assert_eq!(deployment.gateway.policy(&deployment.host).unwrap(), store);

    let decision = deployment
        .decision(token, Selector::from_signature("anything()"))
        .unwrap();
    assert_eq!(decision.path, Some(AuthorizationPath::Target));
}
