#![allow(non_snake_case)]

use kerzh_demo::{
    notification::Severity,
    session::{
        AuthMode,
        DEFAULT_DISPLAY_NAME,
        DEMO_STARTING_BALANCE,
        Identity,
        Intent,
        Outcome,
        Rejection,
        Rules,
        Session,
        WELCOME_BONUS,
        WalletOp,
        reduce,
    },
};
use proptest::prelude::*;

fn rules() -> Rules {
    Rules::default()
}

fn authenticate(name: &str, email: &str, mode: AuthMode) -> Intent {
    Intent::Authenticate {
        name: name.to_string(),
        email: email.to_string(),
        mode,
    }
}

fn demo_session() -> Session {
    reduce(&Session::Anonymous, &Intent::StartDemo, &rules()).session
}

fn registered_session() -> Session {
    reduce(
        &Session::Anonymous,
        &authenticate("Alice", "a@x.com", AuthMode::Register),
        &rules(),
    )
    .session
}

#[test]
fn start_demo__grants_demo_balance_from_anonymous() {
    // when
    let t = reduce(&Session::Anonymous, &Intent::StartDemo, &rules());

    // then
    assert_eq!(Identity::Demo, t.session.identity());
    assert_eq!(Some(DEMO_STARTING_BALANCE), t.session.balance());
    assert!(t.session.display_name().is_some_and(|n| !n.is_empty()));
    assert_eq!(Severity::Default, t.notification.severity);
    assert!(t.notification.description.contains("5\u{a0}000"));
}

#[test]
fn start_demo__resets_from_any_prior_state() {
    // given
    let rich = reduce(
        &registered_session(),
        &Intent::Deposit { amount: 90_000 },
        &rules(),
    )
    .session;
    let spent = reduce(&rich, &Intent::Withdraw { amount: 1_000 }, &rules()).session;

    for prior in [demo_session(), rich, spent] {
        // when
        let t = reduce(&prior, &Intent::StartDemo, &rules());

        // then
        assert_eq!(Identity::Demo, t.session.identity());
        assert_eq!(Some(DEMO_STARTING_BALANCE), t.session.balance());
    }
}

#[test]
fn authenticate__grants_welcome_bonus() {
    // when
    let t = reduce(
        &Session::Anonymous,
        &authenticate("Alice", "a@x.com", AuthMode::Register),
        &rules(),
    );

    // then
    assert_eq!(Identity::Registered, t.session.identity());
    assert_eq!(Some("Alice"), t.session.display_name());
    assert_eq!(Some("a@x.com"), t.session.email());
    assert_eq!(Some(WELCOME_BONUS), t.session.balance());
    assert_eq!("Registration complete!", t.notification.title);
    assert_eq!(Severity::Default, t.notification.severity);
}

#[test]
fn authenticate__empty_name_gets_default_label() {
    // when
    let t = reduce(
        &Session::Anonymous,
        &authenticate("", "a@x.com", AuthMode::Login),
        &rules(),
    );

    // then
    assert_eq!(Some(DEFAULT_DISPLAY_NAME), t.session.display_name());
    assert!(!DEFAULT_DISPLAY_NAME.is_empty());
    assert_eq!("Welcome back!", t.notification.title);
}

#[test]
fn authenticate__mode_only_changes_wording() {
    let login = reduce(
        &Session::Anonymous,
        &authenticate("Bob", "b@x.com", AuthMode::Login),
        &rules(),
    );
    let register = reduce(
        &Session::Anonymous,
        &authenticate("Bob", "b@x.com", AuthMode::Register),
        &rules(),
    );

    assert_eq!(login.session, register.session);
    assert_ne!(login.notification.title, register.notification.title);
    assert_eq!(login.notification.description, register.notification.description);
}

#[test]
fn authenticate__replaces_demo_balance_with_welcome_bonus() {
    // given
    let demo = demo_session();

    // when
    let t = reduce(
        &demo,
        &authenticate("Alice", "a@x.com", AuthMode::Register),
        &rules(),
    );

    // then
    assert_eq!(Identity::Registered, t.session.identity());
    assert_eq!(Some(WELCOME_BONUS), t.session.balance());
}

#[test]
fn authenticate__discards_existing_registered_balance() {
    // given
    let topped_up = reduce(
        &registered_session(),
        &Intent::Deposit { amount: 3_000 },
        &rules(),
    )
    .session;

    // when
    let t = reduce(
        &topped_up,
        &authenticate("Carol", "c@x.com", AuthMode::Login),
        &rules(),
    );

    // then
    assert_eq!(Some("Carol"), t.session.display_name());
    assert_eq!(Some(WELCOME_BONUS), t.session.balance());
}

#[test]
fn deposit__rejected_in_demo() {
    // given
    let demo = demo_session();

    // when
    let t = reduce(&demo, &Intent::Deposit { amount: 2_000 }, &rules());

    // then
    assert_eq!(demo, t.session);
    assert_eq!(Some(5_000), t.session.balance());
    assert_eq!(
        Outcome::Rejected(Rejection::DemoMode {
            op: WalletOp::Deposit
        }),
        t.outcome
    );
    assert_eq!(Severity::Destructive, t.notification.severity);
    assert!(t.notification.description.contains("Register"));
}

#[test]
fn deposit__credits_registered_balance() {
    // when
    let t = reduce(
        &registered_session(),
        &Intent::Deposit { amount: 3_000 },
        &rules(),
    );

    // then
    assert_eq!(Some(13_000), t.session.balance());
    assert_eq!(
        Outcome::Deposited {
            amount: 3_000,
            balance: 13_000
        },
        t.outcome
    );
    assert_eq!(Severity::Default, t.notification.severity);
    assert_eq!("3\u{a0}000 ₽ credited via SBP", t.notification.description);
}

#[test]
fn withdraw__insufficient_funds_leaves_balance() {
    // given
    let session = registered_session();

    // when
    let t = reduce(&session, &Intent::Withdraw { amount: 15_000 }, &rules());

    // then
    assert_eq!(session, t.session);
    assert_eq!(Some(10_000), t.session.balance());
    assert_eq!(
        Outcome::Rejected(Rejection::InsufficientFunds {
            requested: 15_000,
            available: 10_000
        }),
        t.outcome
    );
    assert_eq!(Severity::Destructive, t.notification.severity);
    assert_eq!("Insufficient funds", t.notification.description);
}

#[test]
fn withdraw__exact_balance_reaches_zero() {
    // when
    let t = reduce(
        &registered_session(),
        &Intent::Withdraw { amount: 10_000 },
        &rules(),
    );

    // then
    assert_eq!(Some(0), t.session.balance());
    assert_eq!(Identity::Registered, t.session.identity());
    assert_eq!(Severity::Default, t.notification.severity);
    assert!(t.notification.description.contains("5 minutes"));

    // and nothing more can leave
    let t = reduce(&t.session, &Intent::Withdraw { amount: 1 }, &rules());
    assert_eq!(Some(0), t.session.balance());
    assert!(t.outcome.is_rejected());
}

#[test]
fn withdraw__rejected_in_demo() {
    // given
    let demo = demo_session();

    // when
    let t = reduce(&demo, &Intent::Withdraw { amount: 1_000 }, &rules());

    // then
    assert_eq!(demo, t.session);
    assert_eq!(
        Outcome::Rejected(Rejection::DemoMode {
            op: WalletOp::Withdraw
        }),
        t.outcome
    );
    assert_eq!(Severity::Destructive, t.notification.severity);
}

#[test]
fn wallet__rejected_without_session() {
    for (intent, op) in [
        (Intent::Deposit { amount: 500 }, WalletOp::Deposit),
        (Intent::Withdraw { amount: 500 }, WalletOp::Withdraw),
    ] {
        // when
        let t = reduce(&Session::Anonymous, &intent, &rules());

        // then
        assert_eq!(Session::Anonymous, t.session);
        assert_eq!(Outcome::Rejected(Rejection::Unauthenticated { op }), t.outcome);
        assert_eq!(Severity::Destructive, t.notification.severity);
        assert_eq!(None, t.session.balance());
    }
}

#[test]
fn wallet__zero_amount_rejected() {
    let session = registered_session();
    for intent in [Intent::Deposit { amount: 0 }, Intent::Withdraw { amount: 0 }] {
        let t = reduce(&session, &intent, &rules());
        assert_eq!(session, t.session);
        assert!(matches!(
            t.outcome,
            Outcome::Rejected(Rejection::InvalidAmount { .. })
        ));
        assert_eq!(Severity::Destructive, t.notification.severity);
    }
}

#[test]
fn wallet__demo_check_precedes_amount_check() {
    // given
    let demo = demo_session();

    for (intent, op) in [
        (Intent::Deposit { amount: 0 }, WalletOp::Deposit),
        (Intent::Withdraw { amount: 0 }, WalletOp::Withdraw),
    ] {
        // when
        let t = reduce(&demo, &intent, &rules());

        // then
        assert_eq!(demo, t.session);
        assert_eq!(Outcome::Rejected(Rejection::DemoMode { op }), t.outcome);
        assert_eq!(Some(&Rejection::DemoMode { op }), t.outcome.rejection());
        assert_eq!(Severity::Destructive, t.notification.severity);
    }
}

#[test]
fn rules__custom_grants_are_honored() {
    let rules = Rules {
        demo_balance: 777,
        welcome_bonus: 1_234,
        ..Rules::default()
    };
    let demo = reduce(&Session::Anonymous, &Intent::StartDemo, &rules);
    assert_eq!(Some(777), demo.session.balance());
    let registered = reduce(
        &demo.session,
        &authenticate("Dan", "d@x.com", AuthMode::Register),
        &rules,
    );
    assert_eq!(Some(1_234), registered.session.balance());
}

fn session_strategy() -> impl Strategy<Value = Session> {
    prop_oneof![
        Just(Session::Anonymous),
        Just(demo_session()),
        (0u64..1_000_000).prop_map(|extra| {
            reduce(
                &registered_session(),
                &Intent::Deposit { amount: extra.max(1) },
                &Rules::default(),
            )
            .session
        }),
    ]
}

fn intent_strategy() -> impl Strategy<Value = Intent> {
    prop_oneof![
        Just(Intent::StartDemo),
        ("[a-zA-Z ]{0,8}", any::<bool>()).prop_map(|(name, register)| {
            let mode = if register {
                AuthMode::Register
            } else {
                AuthMode::Login
            };
            authenticate(&name, "p@x.com", mode)
        }),
        (0u64..50_000).prop_map(|amount| Intent::Deposit { amount }),
        (0u64..50_000).prop_map(|amount| Intent::Withdraw { amount }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn rejection__repeats_never_move_balance(
        (start, amount, repeats) in (
            prop_oneof![Just(0usize), Just(1usize), Just(2usize)],
            1u64..20_000,
            1usize..20,
        )
    ) {
        // given: demo, anonymous, or an over-withdrawal
        let (session, intent) = match start {
            0 => (demo_session(), Intent::Deposit { amount }),
            1 => (Session::Anonymous, Intent::Withdraw { amount }),
            _ => (registered_session(), Intent::Withdraw { amount: WELCOME_BONUS + amount }),
        };

        // when
        let mut current = session.clone();
        let mut notifications = Vec::new();
        for _ in 0..repeats {
            let t = reduce(&current, &intent, &rules());
            prop_assert!(t.outcome.is_rejected());
            notifications.push(t.notification);
            current = t.session;
        }

        // then
        prop_assert_eq!(session.balance(), current.balance());
        prop_assert_eq!(session, current);
        prop_assert_eq!(repeats, notifications.len());
        prop_assert!(notifications.iter().all(|n| n.severity == Severity::Destructive));
    }

    #[test]
    fn transition__exactly_one_identity_holds(
        start in session_strategy(),
        intents in prop::collection::vec(intent_strategy(), 1..12),
    ) {
        let mut session = start;
        for intent in &intents {
            let before = session.balance();
            let t = reduce(&session, intent, &rules());
            let flags = [
                t.session.is_anonymous(),
                t.session.is_demo(),
                t.session.is_registered(),
            ];
            prop_assert_eq!(1, flags.iter().filter(|f| **f).count());
            prop_assert_eq!(
                t.session.is_anonymous(),
                t.session.balance().is_none()
            );
            // rejections leave state alone, successes notify as default
            if t.outcome.is_rejected() {
                prop_assert_eq!(&session, &t.session);
                prop_assert_eq!(Severity::Destructive, t.notification.severity);
            } else {
                prop_assert_eq!(Severity::Default, t.notification.severity);
                prop_assert!(!t.session.is_anonymous());
            }
            if session.is_demo() && matches!(intent, Intent::Deposit { .. } | Intent::Withdraw { .. }) {
                prop_assert_eq!(before, t.session.balance());
            }
            session = t.session;
        }
    }
}
