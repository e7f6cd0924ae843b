/// Reed-Solomon error correction for QR codes
/// QR codes use RS over GF(256) with primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
use thiserror::Error;

/// A block has more errors than its error correction codewords can repair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Reed-Solomon block is uncorrectable")]
pub struct Uncorrectable;

/// Block-level error corrector used by the codeword assembler
pub trait ErrorCorrector: Send + Sync {
    /// Correct one block, returning the repaired data codewords
    fn correct(&self, data: &[u8], ec: &[u8]) -> Result<Vec<u8>, Uncorrectable>;
}

const PRIMITIVE: u16 = 0x11D;

const fn build_tables() -> ([u8; 512], [u8; 256]) {
    let mut exp = [0u8; 512];
    let mut log = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = x as u8;
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    while i < 512 {
        exp[i] = exp[i - 255];
        i += 1;
    }
    (exp, log)
}

const TABLES: ([u8; 512], [u8; 256]) = build_tables();
static EXP_TABLE: [u8; 512] = TABLES.0;
static LOG_TABLE: [u8; 256] = TABLES.1;

/// GF(256) field operations using log/exp tables
pub struct Gf256;

impl Gf256 {
    /// Field product
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        EXP_TABLE[LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize]
    }

    /// `None` when dividing by zero
    pub fn div(a: u8, b: u8) -> Option<u8> {
        if b == 0 {
            return None;
        }
        if a == 0 {
            return Some(0);
        }
        Some(EXP_TABLE[LOG_TABLE[a as usize] as usize + 255 - LOG_TABLE[b as usize] as usize])
    }

    /// alpha^n
    pub fn exp(n: usize) -> u8 {
        EXP_TABLE[n % 255]
    }

    /// Evaluate a polynomial with ascending coefficients at `x`
    fn eval_ascending(poly: &[u8], x: u8) -> u8 {
        poly.iter().rev().fold(0u8, |acc, &c| Self::mul(acc, x) ^ c)
    }
}

/// Reed-Solomon decoder for QR codes (generator roots alpha^0 .. alpha^(ecc-1))
#[derive(Debug, Clone, Copy, Default)]
pub struct ReedSolomonDecoder;

impl ReedSolomonDecoder {
    /// Correct `received` (data followed by `num_ecc` EC codewords) in place.
    /// Returns the number of corrected codewords.
    pub fn decode(&self, received: &mut [u8], num_ecc: usize) -> Result<usize, Uncorrectable> {
        if num_ecc == 0 || received.len() > 255 || received.len() <= num_ecc {
            return Err(Uncorrectable);
        }

        let syndrome = Self::calculate_syndrome(received, num_ecc);
        if syndrome.iter().all(|&s| s == 0) {
            return Ok(0);
        }

        let sigma = Self::find_error_locator(&syndrome)?;
        let error_positions = Self::find_error_positions(&sigma, received.len())?;
        let error_values =
            Self::find_error_values(&sigma, &syndrome, &error_positions, received.len())?;

        for (&pos, &value) in error_positions.iter().zip(error_values.iter()) {
            received[pos] ^= value;
        }

        // A miscorrection leaves a non-zero syndrome behind
        if Self::calculate_syndrome(received, num_ecc).iter().any(|&s| s != 0) {
            return Err(Uncorrectable);
        }

        Ok(error_positions.len())
    }

    /// S_i = r(alpha^i), with `received[0]` the coefficient of x^(n-1)
    fn calculate_syndrome(received: &[u8], num_ecc: usize) -> Vec<u8> {
        (0..num_ecc)
            .map(|i| {
                let x = Gf256::exp(i);
                received.iter().fold(0u8, |acc, &r| Gf256::mul(acc, x) ^ r)
            })
            .collect()
    }

    /// Berlekamp-Massey; the locator is returned with ascending coefficients
    fn find_error_locator(syndrome: &[u8]) -> Result<Vec<u8>, Uncorrectable> {
        let mut sigma = vec![1u8];
        let mut b = vec![1u8];
        let mut delta_b: u8 = 1;
        let mut l = 0usize;
        let mut m = 1usize;

        for n in 0..syndrome.len() {
            let mut delta = syndrome[n];
            for i in 1..=l.min(sigma.len() - 1) {
                delta ^= Gf256::mul(sigma[i], syndrome[n - i]);
            }

            if delta == 0 {
                m += 1;
                continue;
            }

            let coef = Gf256::div(delta, delta_b).ok_or(Uncorrectable)?;
            let previous = sigma.clone();
            if sigma.len() < b.len() + m {
                sigma.resize(b.len() + m, 0);
            }
            for (j, &bj) in b.iter().enumerate() {
                sigma[j + m] ^= Gf256::mul(coef, bj);
            }

            if 2 * l <= n {
                l = n + 1 - l;
                b = previous;
                delta_b = delta;
                m = 1;
            } else {
                m += 1;
            }
        }

        while sigma.len() > 1 && sigma.last() == Some(&0) {
            sigma.pop();
        }
        if sigma.len() - 1 != l || 2 * l > syndrome.len() {
            return Err(Uncorrectable);
        }
        Ok(sigma)
    }

    /// Chien search: roots of sigma are X_k^-1 = alpha^-(n-1-pos)
    fn find_error_positions(sigma: &[u8], n: usize) -> Result<Vec<usize>, Uncorrectable> {
        let positions: Vec<usize> = (0..n)
            .filter(|&i| {
                let exp = (n - 1 - i) % 255;
                Gf256::eval_ascending(sigma, Gf256::exp(255 - exp)) == 0
            })
            .collect();

        if positions.len() != sigma.len() - 1 {
            return Err(Uncorrectable);
        }
        Ok(positions)
    }

    /// Forney: e_k = X_k * omega(X_k^-1) / sigma'(X_k^-1)
    fn find_error_values(
        sigma: &[u8],
        syndrome: &[u8],
        error_positions: &[usize],
        n: usize,
    ) -> Result<Vec<u8>, Uncorrectable> {
        // omega = syndrome * sigma mod x^(2t)
        let mut omega = vec![0u8; syndrome.len()];
        for (i, omega_i) in omega.iter_mut().enumerate() {
            for j in 0..=i.min(sigma.len() - 1) {
                *omega_i ^= Gf256::mul(sigma[j], syndrome[i - j]);
            }
        }

        // sigma'(x) keeps the odd-degree terms, shifted down one degree
        let sigma_prime: Vec<u8> = sigma
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &c)| if i % 2 == 1 { c } else { 0 })
            .collect();

        error_positions
            .iter()
            .map(|&pos| {
                let exp = (n - 1 - pos) % 255;
                let x_inv = Gf256::exp(255 - exp);
                let omega_val = Gf256::eval_ascending(&omega, x_inv);
                let sigma_prime_val = Gf256::eval_ascending(&sigma_prime, x_inv);
                let quotient = Gf256::div(omega_val, sigma_prime_val).ok_or(Uncorrectable)?;
                Ok(Gf256::mul(Gf256::exp(exp), quotient))
            })
            .collect()
    }
}

impl ErrorCorrector for ReedSolomonDecoder {
    fn correct(&self, data: &[u8], ec: &[u8]) -> Result<Vec<u8>, Uncorrectable> {
        let mut block = Vec::with_capacity(data.len() + ec.len());
        block.extend_from_slice(data);
        block.extend_from_slice(ec);
        self.decode(&mut block, ec.len())?;
        block.truncate(data.len());
        Ok(block)
    }
}
