//! Integration tests for the pre-sale allowlist.
//!
//! Trees are built off-chain with `presale-common` (and the `allowlist`
//! tool's input parser), then the minter contract is driven through its
//! `instantiate` / `execute` / `query` entry points using
//! `cosmwasm_std::testing` mocks.
//!
//! Run:
//! ```bash
//! cargo test -p presale-integration-tests
//! ```

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    coins, from_json, Addr, Api, CanonicalAddr, MemoryStorage, OwnedDeps, Response, Uint128,
};
use presale_common::merkle::{encode_hash, hash_entry};
use presale_common::{Address, AllowanceTree, ClaimEntry, Snapshot};
use presale_minter::contract::{execute, instantiate, query};
use presale_minter::msg::{
    ClaimedResponse, ExecuteMsg, InstantiateMsg, OwnerOfResponse, QueryMsg, StatusResponse,
};
use presale_minter::ContractError;

type Deps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

const DENOM: &str = "inj";
const PRE_SALE_PRICE: u128 = 500_000;
const SALE_PRICE: u128 = 800_000;

// ─── Helpers ───

/// A 20-byte bech32 account and the allowlist address it maps to.
fn account(seed: u8) -> (Addr, Address) {
    let addr = MockApi::default()
        .addr_humanize(&CanonicalAddr::from(vec![seed; 20]))
        .unwrap();
    (addr, Address::new([seed; 20]))
}

fn admin() -> Addr {
    MockApi::default().addr_make("admin")
}

fn setup_minter(deps: &mut Deps, max_supply: u64) {
    let msg = InstantiateMsg {
        denom: DENOM.to_string(),
        pre_sale_price: Uint128::new(PRE_SALE_PRICE),
        sale_price: Uint128::new(SALE_PRICE),
        max_supply,
        merkle_root: None,
    };
    instantiate(deps.as_mut(), mock_env(), message_info(&admin(), &[]), msg).unwrap();
}

fn admin_exec(deps: &mut Deps, msg: ExecuteMsg) -> Response {
    execute(deps.as_mut(), mock_env(), message_info(&admin(), &[]), msg).unwrap()
}

fn open_pre_sale(deps: &mut Deps, snapshot: &Snapshot) {
    admin_exec(
        deps,
        ExecuteMsg::SetPreSaleRoot {
            merkle_root: snapshot.merkle_root.clone(),
        },
    );
    admin_exec(deps, ExecuteMsg::FlipPreSaleState {});
}

fn claim_file(snapshot: &Snapshot, address: &Address) -> ClaimEntry {
    // Round-trip through JSON the way a user would receive it
    let json = serde_json::to_string(snapshot.claim(address).unwrap()).unwrap();
    serde_json::from_str(&json).unwrap()
}

fn pre_sale_mint(
    deps: &mut Deps,
    sender: &Addr,
    claim: &ClaimEntry,
    amount: u64,
) -> Result<Response, ContractError> {
    execute(
        deps.as_mut(),
        mock_env(),
        message_info(sender, &coins(PRE_SALE_PRICE * amount as u128, DENOM)),
        ExecuteMsg::PreSaleMint {
            amount,
            allowance: claim.allowance().unwrap(),
            proof: claim.proof.clone(),
        },
    )
}

fn claimed(deps: &Deps, addr: &Addr) -> u64 {
    let res = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::PreSaleClaimed {
            address: addr.to_string(),
        },
    )
    .unwrap();
    from_json::<ClaimedResponse>(res).unwrap().claimed
}

fn status(deps: &Deps) -> StatusResponse {
    from_json(query(deps.as_ref(), mock_env(), QueryMsg::Status {}).unwrap()).unwrap()
}

fn token_ids(res: &Response) -> Vec<u64> {
    res.events
        .iter()
        .filter(|e| e.ty == "presale_mint")
        .filter_map(|e| e.attributes.iter().find(|a| a.key == "token_id"))
        .map(|a| a.value.parse().unwrap())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_allowlist_scenario() {
    // {u0: 3, u1: 4, u2: 5}
    let (u0, a0) = account(0x10);
    let (u1, a1) = account(0x11);
    let (u2, a2) = account(0x12);
    let csv = format!("address,amount\n{},3\n{},4\n{},5\n", a0, a1, a2);
    let entries = presale_allowlist::input::parse_csv(&csv).unwrap();
    let snapshot = AllowanceTree::build(entries).unwrap().to_snapshot();
    assert_eq!(snapshot.total_amount, "0x0c");

    let mut deps = mock_dependencies();
    setup_minter(&mut deps, 15);
    open_pre_sale(&mut deps, &snapshot);

    // u0 claims all 3 at once
    let c0 = claim_file(&snapshot, &a0);
    let res = pre_sale_mint(&mut deps, &u0, &c0, 3).unwrap();
    assert_eq!(token_ids(&res), vec![0, 1, 2]);
    assert_eq!(claimed(&deps, &u0), 3);

    // u1 claims 1 then 3 with the same proof
    let c1 = claim_file(&snapshot, &a1);
    let res = pre_sale_mint(&mut deps, &u1, &c1, 1).unwrap();
    assert_eq!(token_ids(&res), vec![3]);
    let res = pre_sale_mint(&mut deps, &u1, &c1, 3).unwrap();
    assert_eq!(token_ids(&res), vec![4, 5, 6]);
    assert_eq!(claimed(&deps, &u1), 4);

    // u2 claims 5, then one more is refused
    let c2 = claim_file(&snapshot, &a2);
    pre_sale_mint(&mut deps, &u2, &c2, 5).unwrap();
    let err = pre_sale_mint(&mut deps, &u2, &c2, 1).unwrap_err();
    assert!(
        format!("{:?}", err).contains("ExceedsAllowance"),
        "Expected ExceedsAllowance, got: {:?}",
        err
    );

    assert_eq!(claimed(&deps, &u2), 5);
    assert_eq!(status(&deps).total_supply, 12);

    let res = query(deps.as_ref(), mock_env(), QueryMsg::OwnerOf { token_id: 6 }).unwrap();
    let owner: OwnerOfResponse = from_json(res).unwrap();
    assert_eq!(owner.owner, Some(u1));
}

#[test]
fn test_cumulative_allowance_prefix_sums() {
    let allowance = 10u64;
    let (user, address) = account(0x20);
    let tree = AllowanceTree::build(vec![(address, allowance), (account(0x21).1, 1)]).unwrap();
    let snapshot = tree.to_snapshot();

    let mut deps = mock_dependencies();
    setup_minter(&mut deps, 100);
    open_pre_sale(&mut deps, &snapshot);

    let claim = claim_file(&snapshot, &address);
    let amounts = [2u64, 3, 4, 2, 1];
    let mut total = 0u64;
    for amount in amounts {
        let result = pre_sale_mint(&mut deps, &user, &claim, amount);
        if total + amount <= allowance {
            result.unwrap();
            total += amount;
        } else {
            assert!(matches!(result, Err(ContractError::ExceedsAllowance { .. })));
        }
        assert_eq!(claimed(&deps, &user), total);
        assert_eq!(status(&deps).total_supply, total);
    }
    // 2 + 3 + 4 = 9, the 2 is refused, the final 1 fills the allowance
    assert_eq!(total, 10);
}

#[test]
fn test_supply_ceiling_across_phases() {
    let (u0, a0) = account(0x30);
    let snapshot = AllowanceTree::build(vec![(a0, 5)]).unwrap().to_snapshot();

    let mut deps = mock_dependencies();
    setup_minter(&mut deps, 4);
    open_pre_sale(&mut deps, &snapshot);
    admin_exec(&mut deps, ExecuteMsg::FlipSaleState {});

    // Public buyer takes 2 of 4
    let buyer = deps.api.addr_make("buyer");
    execute(
        deps.as_mut(),
        mock_env(),
        message_info(&buyer, &coins(SALE_PRICE * 2, DENOM)),
        ExecuteMsg::Mint { amount: 2 },
    )
    .unwrap();

    // Allowance of 5 cannot beat the remaining headroom of 2
    let claim = claim_file(&snapshot, &a0);
    let err = pre_sale_mint(&mut deps, &u0, &claim, 3).unwrap_err();
    assert!(matches!(
        err,
        ContractError::ExceedsMaxSupply {
            total_supply: 2,
            amount: 3,
            max_supply: 4
        }
    ));

    let res = pre_sale_mint(&mut deps, &u0, &claim, 2).unwrap();
    assert_eq!(token_ids(&res), vec![2, 3]);
    assert_eq!(status(&deps).total_supply, 4);

    // Raising the ceiling re-opens minting
    admin_exec(&mut deps, ExecuteMsg::SetMaxSupply { max_supply: 5 });
    let res = pre_sale_mint(&mut deps, &u0, &claim, 1).unwrap();
    assert_eq!(token_ids(&res), vec![4]);
}

#[test]
fn test_phase_gating_ignores_valid_proof() {
    let (u0, a0) = account(0x40);
    let snapshot = AllowanceTree::build(vec![(a0, 2)]).unwrap().to_snapshot();

    let mut deps = mock_dependencies();
    setup_minter(&mut deps, 10);
    admin_exec(
        &mut deps,
        ExecuteMsg::SetPreSaleRoot {
            merkle_root: snapshot.merkle_root.clone(),
        },
    );
    // Public sale on does not open the pre-sale
    admin_exec(&mut deps, ExecuteMsg::FlipSaleState {});

    let claim = claim_file(&snapshot, &a0);
    let err = pre_sale_mint(&mut deps, &u0, &claim, 1).unwrap_err();
    assert!(matches!(err, ContractError::PhaseDisabled { .. }));
    assert_eq!(claimed(&deps, &u0), 0);
}

#[test]
fn test_root_replacement_invalidates_old_proofs() {
    let (u0, a0) = account(0x50);
    let (u1, a1) = account(0x51);
    let first = AllowanceTree::build(vec![(a0, 3), (a1, 3)]).unwrap().to_snapshot();
    let second = AllowanceTree::build(vec![(a0, 4)]).unwrap().to_snapshot();

    let mut deps = mock_dependencies();
    setup_minter(&mut deps, 100);
    open_pre_sale(&mut deps, &first);

    pre_sale_mint(&mut deps, &u0, &claim_file(&first, &a0), 3).unwrap();
    pre_sale_mint(&mut deps, &u1, &claim_file(&first, &a1), 1).unwrap();

    admin_exec(
        &mut deps,
        ExecuteMsg::SetPreSaleRoot {
            merkle_root: second.merkle_root.clone(),
        },
    );

    // u1 is not in the new snapshot; its old proof is dead but the ledger keeps 1
    let err = pre_sale_mint(&mut deps, &u1, &claim_file(&first, &a1), 1).unwrap_err();
    assert!(matches!(err, ContractError::InvalidProof));
    assert_eq!(claimed(&deps, &u1), 1);

    // u0 moved from 3 to 4: only one more fits
    let claim = claim_file(&second, &a0);
    let err = pre_sale_mint(&mut deps, &u0, &claim, 2).unwrap_err();
    assert!(matches!(err, ContractError::ExceedsAllowance { claimed: 3, .. }));
    pre_sale_mint(&mut deps, &u0, &claim, 1).unwrap();
    assert_eq!(claimed(&deps, &u0), 4);
}

#[test]
fn test_verify_allowance_query_matches_off_chain_tree() {
    let accounts: Vec<(Addr, Address)> = (0x60..0x67).map(account).collect();
    let tree = AllowanceTree::build(
        accounts
            .iter()
            .enumerate()
            .map(|(i, (_, address))| (*address, i as u64 + 1)),
    )
    .unwrap();
    let snapshot = tree.to_snapshot();

    let mut deps = mock_dependencies();
    setup_minter(&mut deps, 100);
    admin_exec(
        &mut deps,
        ExecuteMsg::SetPreSaleRoot {
            merkle_root: snapshot.merkle_root.clone(),
        },
    );

    for (addr, address) in &accounts {
        let claim = snapshot.claim(address).unwrap();
        let allowance = claim.allowance().unwrap();
        assert_eq!(
            claim.proof.len(),
            tree.proof(address).unwrap().len(),
            "snapshot proof must match the tree"
        );

        let verify = |allowance: u64| -> bool {
            let res = query(
                deps.as_ref(),
                mock_env(),
                QueryMsg::VerifyAllowance {
                    address: addr.to_string(),
                    allowance,
                    proof: claim.proof.clone(),
                    merkle_root: None,
                },
            )
            .unwrap();
            from_json(res).unwrap()
        };
        assert!(verify(allowance));
        assert!(!verify(allowance + 1));
    }

    // Leaf hashing on both sides agrees byte-for-byte
    let (_, a0) = &accounts[0];
    let leaf = hash_entry(a0, 1);
    let proof = tree.proof(a0).unwrap();
    assert!(presale_common::verify_proof(&tree.root(), &leaf, &proof));
    assert_eq!(
        status(&deps).merkle_root,
        Some(hex::encode(tree.root())),
        "stored root is normalised hex of the built root"
    );
    assert_eq!(snapshot.merkle_root, encode_hash(&tree.root()));
}

#[test]
fn test_payments_collect_and_withdraw() {
    let (u0, a0) = account(0x70);
    let snapshot = AllowanceTree::build(vec![(a0, 2)]).unwrap().to_snapshot();

    let mut deps = mock_dependencies();
    setup_minter(&mut deps, 10);
    open_pre_sale(&mut deps, &snapshot);

    // Overpaying is accepted
    let claim = claim_file(&snapshot, &a0);
    let res = execute(
        deps.as_mut(),
        mock_env(),
        message_info(&u0, &coins(PRE_SALE_PRICE * 3, DENOM)),
        ExecuteMsg::PreSaleMint {
            amount: 2,
            allowance: claim.allowance().unwrap(),
            proof: claim.proof.clone(),
        },
    )
    .unwrap();
    assert!(res
        .attributes
        .iter()
        .any(|a| a.key == "paid" && a.value == (PRE_SALE_PRICE * 3).to_string()));

    // The mock bank does not move funds, so seed the contract balance
    let env = mock_env();
    deps.querier
        .bank
        .update_balance(env.contract.address.as_str(), coins(PRE_SALE_PRICE * 3, DENOM));

    let res = admin_exec(
        &mut deps,
        ExecuteMsg::Withdraw {
            recipient: None,
            denom: None,
        },
    );
    assert_eq!(res.messages.len(), 1);
    assert!(res
        .events
        .iter()
        .any(|e| e.ty == "presale_withdraw"));
}
