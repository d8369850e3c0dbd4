//! Diagnostics rendering and header equality.

use crate::core::header::Header;
use crate::core::types::HeaderForm;
use std::fmt;
use std::io;

impl Header {
    /// Long packet type name, or the packet number width label for short headers
    pub fn type_name(&self) -> &'static str {
        match self.form {
            HeaderForm::Long => self.long_type.name(),
            HeaderForm::Short => self.pn_len.label(),
        }
    }

    /// Write the multi-line dump produced by `Display`
    pub fn print<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "|{}|fixed={}|",
            self.form.name(),
            u8::from(self.fixed_bit)
        )?;
        if self.is_short() {
            write!(
                f,
                "spin={}|key_phase={}|",
                u8::from(self.spin_bit),
                u8::from(self.key_phase_bit)
            )?;
        }
        writeln!(f, "{}|", self.type_name())?;

        if self.has_connection_id() {
            writeln!(f, "|ConnectionID {}|", self.dcid)?;
        }
        if self.is_long() {
            writeln!(f, "|SourceConnectionID {}|", self.scid)?;
            writeln!(f, "|Version {}|", self.version)?;
        }
        write!(f, "|PacketNumber {}|", self.packet_number)
    }
}

impl PartialEq for Header {
    /// Headers of different forms never compare equal. The fixed bit and the
    /// short-form connection id presence flag are not compared.
    fn eq(&self, other: &Self) -> bool {
        if self.form != other.form {
            return false;
        }
        match self.form {
            HeaderForm::Long => {
                self.long_type == other.long_type
                    && self.version == other.version
                    && self.dest_conn_id_len() == other.dest_conn_id_len()
                    && self.dcid == other.dcid
                    && self.src_conn_id_len() == other.src_conn_id_len()
                    && self.scid == other.scid
                    && self.packet_number == other.packet_number
            }
            HeaderForm::Short => {
                self.spin_bit == other.spin_bit
                    && self.key_phase_bit == other.key_phase_bit
                    && self.pn_len == other.pn_len
                    && self.dcid == other.dcid
                    && self.packet_number == other.packet_number
            }
        }
    }
}

impl Eq for Header {}
