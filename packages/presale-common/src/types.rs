use cosmwasm_schema::cw_serde;

/// The two independently toggled minting phases.
#[cw_serde]
#[derive(Copy)]
pub enum SalePhase {
    PreSale,
    Public,
}

impl SalePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalePhase::PreSale => "pre_sale",
            SalePhase::Public => "public",
        }
    }
}
