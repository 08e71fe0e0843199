pub mod protonate;
