//! # Opcode Table
//!
//! The LS-8 instruction set as a closed enum. Each opcode byte encodes its own
//! shape:
//!
//! ```text
//! AABCDDDD
//! AA   - number of operands (0-2)
//! B    - 1 if the instruction is executed by the ALU
//! C    - 1 if the instruction sets the program counter itself
//! DDDD - instruction identifier
//! ```
//!
//! The metadata methods below agree with that layout; `opcode_table_test`
//! checks every variant against it.

use crate::alu::AluOp;

/// Every instruction the LS-8 understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Hlt = 0b0000_0001,
    Ldi = 0b1000_0010,
    Prn = 0b0100_0111,
    Push = 0b0100_0101,
    Pop = 0b0100_0110,
    Call = 0b0101_0000,
    Ret = 0b0001_0001,
    St = 0b1000_0100,
    Iret = 0b0001_0011,
    Jmp = 0b0101_0100,
    Pra = 0b0100_1000,
    Jeq = 0b0101_0101,
    Jne = 0b0101_0110,
    Addi = 0b1000_1000,
    Add = 0b1010_0000,
    Mul = 0b1010_0010,
    Mod = 0b1010_0100,
    Cmp = 0b1010_0111,
    And = 0b1010_1000,
    Or = 0b1010_1010,
    Xor = 0b1010_1011,
    Not = 0b0110_1001,
    Shl = 0b1010_1100,
    Shr = 0b1010_1101,
}

impl Opcode {
    /// All opcodes, in table order.
    pub const ALL: [Opcode; 24] = [
        Opcode::Hlt,
        Opcode::Ldi,
        Opcode::Prn,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Call,
        Opcode::Ret,
        Opcode::St,
        Opcode::Iret,
        Opcode::Jmp,
        Opcode::Pra,
        Opcode::Jeq,
        Opcode::Jne,
        Opcode::Addi,
        Opcode::Add,
        Opcode::Mul,
        Opcode::Mod,
        Opcode::Cmp,
        Opcode::And,
        Opcode::Or,
        Opcode::Xor,
        Opcode::Not,
        Opcode::Shl,
        Opcode::Shr,
    ];

    /// Decodes an opcode byte, `None` if it is not an instruction.
    pub const fn from_byte(byte: u8) -> Option<Opcode> {
        Some(match byte {
            0b0000_0001 => Opcode::Hlt,
            0b1000_0010 => Opcode::Ldi,
            0b0100_0111 => Opcode::Prn,
            0b0100_0101 => Opcode::Push,
            0b0100_0110 => Opcode::Pop,
            0b0101_0000 => Opcode::Call,
            0b0001_0001 => Opcode::Ret,
            0b1000_0100 => Opcode::St,
            0b0001_0011 => Opcode::Iret,
            0b0101_0100 => Opcode::Jmp,
            0b0100_1000 => Opcode::Pra,
            0b0101_0101 => Opcode::Jeq,
            0b0101_0110 => Opcode::Jne,
            0b1000_1000 => Opcode::Addi,
            0b1010_0000 => Opcode::Add,
            0b1010_0010 => Opcode::Mul,
            0b1010_0100 => Opcode::Mod,
            0b1010_0111 => Opcode::Cmp,
            0b1010_1000 => Opcode::And,
            0b1010_1010 => Opcode::Or,
            0b1010_1011 => Opcode::Xor,
            0b0110_1001 => Opcode::Not,
            0b1010_1100 => Opcode::Shl,
            0b1010_1101 => Opcode::Shr,
            _ => return None,
        })
    }

    pub const fn byte(self) -> u8 {
        self as u8
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Hlt => "HLT",
            Opcode::Ldi => "LDI",
            Opcode::Prn => "PRN",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
            Opcode::St => "ST",
            Opcode::Iret => "IRET",
            Opcode::Jmp => "JMP",
            Opcode::Pra => "PRA",
            Opcode::Jeq => "JEQ",
            Opcode::Jne => "JNE",
            Opcode::Addi => "ADDI",
            Opcode::Add => "ADD",
            Opcode::Mul => "MUL",
            Opcode::Mod => "MOD",
            Opcode::Cmp => "CMP",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Xor => "XOR",
            Opcode::Not => "NOT",
            Opcode::Shl => "SHL",
            Opcode::Shr => "SHR",
        }
    }

    /// Number of operand bytes following the opcode.
    pub const fn operand_count(self) -> u8 {
        match self {
            Opcode::Hlt | Opcode::Ret | Opcode::Iret => 0,
            Opcode::Prn
            | Opcode::Push
            | Opcode::Pop
            | Opcode::Call
            | Opcode::Jmp
            | Opcode::Pra
            | Opcode::Jeq
            | Opcode::Jne
            | Opcode::Not => 1,
            Opcode::Ldi
            | Opcode::St
            | Opcode::Addi
            | Opcode::Add
            | Opcode::Mul
            | Opcode::Mod
            | Opcode::Cmp
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Shl
            | Opcode::Shr => 2,
        }
    }

    /// Total instruction width in bytes, opcode included (1-3).
    pub const fn size_bytes(self) -> u8 {
        self.operand_count() + 1
    }

    /// The ALU operation this opcode performs, if it is an ALU instruction.
    pub const fn alu_op(self) -> Option<AluOp> {
        Some(match self {
            Opcode::Add => AluOp::Add,
            Opcode::Mul => AluOp::Mul,
            Opcode::Mod => AluOp::Mod,
            Opcode::Cmp => AluOp::Cmp,
            Opcode::And => AluOp::And,
            Opcode::Or => AluOp::Or,
            Opcode::Xor => AluOp::Xor,
            Opcode::Not => AluOp::Not,
            Opcode::Shl => AluOp::Shl,
            Opcode::Shr => AluOp::Shr,
            _ => return None,
        })
    }

    pub const fn is_alu(self) -> bool {
        self.alu_op().is_some()
    }

    /// Whether the instruction writes the program counter itself instead of
    /// letting it advance by `size_bytes`. JEQ/JNE only do so when taken.
    pub const fn sets_pc(self) -> bool {
        matches!(
            self,
            Opcode::Call
                | Opcode::Ret
                | Opcode::Iret
                | Opcode::Jmp
                | Opcode::Jeq
                | Opcode::Jne
        )
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
