//! PHY register access through the MDI control register.

use super::io::RegisterIo;
use super::regs::{
    MDIC, MDIC_DATA_MASK, MDIC_ERROR, MDIC_OP_READ, MDIC_OP_WRITE, MDIC_PHY_ADDR, MDIC_PHY_SHIFT,
    MDIC_READY, MDIC_REG_SHIFT, PHY_PAGE_SELECT,
};
use crate::error::{AvbError, Result};

/// Number of addressable PHY registers per page.
pub const PHY_REGISTER_COUNT: u32 = 32;

fn command(op: u32, reg: u32, data: u16) -> u32 {
    op | (MDIC_PHY_ADDR << MDIC_PHY_SHIFT) | (reg << MDIC_REG_SHIFT) | u32::from(data)
}

/// Issue one MDIC transaction and poll for completion.
fn transact(io: &mut dyn RegisterIo, cmd: u32, poll_limit: u32) -> Result<u32> {
    io.write(MDIC, cmd)?;
    for _ in 0..poll_limit.max(1) {
        let mdic = io.read(MDIC)?;
        if mdic & MDIC_ERROR != 0 {
            return Err(AvbError::fault(MDIC, "PHY reported MDI error"));
        }
        if mdic & MDIC_READY != 0 {
            return Ok(mdic);
        }
        std::hint::spin_loop();
    }
    Err(AvbError::fault(MDIC, format!("MDI not ready after {poll_limit} polls")))
}

fn check_reg(reg: u32) -> Result<()> {
    if reg >= PHY_REGISTER_COUNT {
        return Err(AvbError::invalid("reg", format!("PHY register {reg} out of range (max 31)")));
    }
    Ok(())
}

/// The PHY keeps the last selected page, so every access selects its own,
/// page 0 included.
fn select_page(io: &mut dyn RegisterIo, page: u32, poll_limit: u32) -> Result<()> {
    let page = u16::try_from(page)
        .map_err(|_| AvbError::invalid("page", format!("PHY page {page} out of range")))?;
    transact(io, command(MDIC_OP_WRITE, PHY_PAGE_SELECT, page), poll_limit)?;
    Ok(())
}

/// Read PHY register `reg` on `page`.
pub fn read(io: &mut dyn RegisterIo, page: u32, reg: u32, poll_limit: u32) -> Result<u16> {
    check_reg(reg)?;
    select_page(io, page, poll_limit)?;
    let mdic = transact(io, command(MDIC_OP_READ, reg, 0), poll_limit)?;
    #[allow(clippy::cast_possible_truncation)]
    let value = (mdic & MDIC_DATA_MASK) as u16;
    tracing::debug!(page, reg, value = format_args!("{value:#06x}"), "MDIO read");
    Ok(value)
}

/// Write `value` to PHY register `reg` on `page`.
pub fn write(io: &mut dyn RegisterIo, page: u32, reg: u32, value: u16, poll_limit: u32) -> Result<()> {
    check_reg(reg)?;
    select_page(io, page, poll_limit)?;
    transact(io, command(MDIC_OP_WRITE, reg, value), poll_limit)?;
    tracing::debug!(page, reg, value = format_args!("{value:#06x}"), "MDIO write");
    Ok(())
}
