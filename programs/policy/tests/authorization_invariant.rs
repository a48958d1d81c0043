//! isAuthorized(t, s) == allowedTargets[t] || allowedMethods[t][s] under any
//! sequence of owner updates.

use proptest::prelude::*;
use relaygate_common::abi::{self, Token};
use relaygate_common::interfaces::policy as sig;
use relaygate_common::{Address, Selector};
use relaygate_policy::PolicyStore;
use relaygate_runtime::{Host, Transaction};
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Update {
    Target { target: usize, allowed: bool },
    Method { target: usize, selector: usize, allowed: bool },
}

fn targets() -> [Address; 2] {
    [Address::from_label("t0"), Address::from_label("t1")]
}

fn selectors() -> [Selector; 3] {
    [
        Selector::from_signature("foo(uint256)"),
        Selector::from_signature("bar(uint256,uint256)"),
        Selector::RECEIVE,
    ]
}

fn update_strategy() -> impl Strategy<Value = Update> {
    prop_oneof![
        (0..2usize, any::<bool>()).prop_map(|(target, allowed)| Update::Target { target, allowed }),
        (0..2usize, 0..3usize, any::<bool>()).prop_map(|(target, selector, allowed)| Update::Method {
            target,
            selector,
            allowed
        }),
    ]
}

fn read_bool(host: &Host, policy: Address, signature: &str, tokens: &[Token]) -> bool {
    let data = abi::encode_call(Selector::from_signature(signature), tokens);
    abi::decode_bool(&host.view(Address::from_label("reader"), policy, &data).unwrap()).unwrap()
}

proptest! {
    #[test]
    fn authorization_is_target_or_method(updates in prop::collection::vec(update_strategy(), 0..24)) {
        let mut host = Host::default();
        let owner = Address::from_label("owner");
        let policy = host.deploy(owner, PolicyStore::new(owner)).unwrap();

        let targets = targets();
        let selectors = selectors();
        let mut allowed_targets: HashSet<usize> = HashSet::new();
        let mut allowed_methods: HashSet<(usize, usize)> = HashSet::new();

        for update in updates {
            let data = match update {
                Update::Target { target, allowed } => {
                    if allowed { allowed_targets.insert(target); } else { allowed_targets.remove(&target); }
                    abi::encode_call(
                        Selector::from_signature(sig::SET_TARGET_STATUS),
                        &[Token::Address(targets[target]), Token::Bool(allowed)],
                    )
                }
                Update::Method { target, selector, allowed } => {
                    if allowed { allowed_methods.insert((target, selector)); } else { allowed_methods.remove(&(target, selector)); }
                    abi::encode_call(
                        Selector::from_signature(sig::SET_METHOD_STATUS),
                        &[Token::Address(targets[target]), Token::Selector(selectors[selector]), Token::Bool(allowed)],
                    )
                }
            };
            prop_assert!(host.transact(&Transaction::new(owner, policy).with_data(data)).is_success());

            for (t, target) in targets.iter().enumerate() {
                let target_bit = read_bool(&host, policy, sig::ALLOWED_TARGETS, &[Token::Address(*target)]);
                prop_assert_eq!(target_bit, allowed_targets.contains(&t));

                for (s, selector) in selectors.iter().enumerate() {
                    let args = [Token::Address(*target), Token::Selector(*selector)];
                    let method_bit = read_bool(&host, policy, sig::ALLOWED_METHODS, &args);
                    let authorized = read_bool(&host, policy, sig::IS_AUTHORIZED, &args);

                    prop_assert_eq!(method_bit, allowed_methods.contains(&(t, s)));
                    prop_assert_eq!(authorized, target_bit || method_bit);
                }
            }
        }
    }
}
