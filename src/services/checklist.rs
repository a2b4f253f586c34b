// src/services/checklist.rs
//! Rekap iuran per anggota per tahun.

use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use crate::error::ApiError;
use crate::models::iuran::{ChecklistRow, ChecklistSnapshot, PaymentStanding};
use crate::store::Store;
use crate::utils::current_year;

const MONTHS: std::ops::RangeInclusive<i32> = 1..=12;

pub async fn checklist(store: &dyn Store, tahun: Option<i32>) -> Result<Vec<ChecklistRow>, ApiError> {
    let tahun = tahun.unwrap_or_else(current_year);
    let snapshot = store.checklist_snapshot(tahun).await?;
    Ok(build_checklist(&snapshot, tahun))
}

#[derive(Default)]
struct Paid {
    total: i64,
    months: BTreeSet<i32>,
}

/// Fungsi murni: hasil tidak bergantung pada urutan pembayaran di snapshot.
pub fn build_checklist(snapshot: &ChecklistSnapshot, tahun: i32) -> Vec<ChecklistRow> {
    let mut paid: HashMap<Uuid, Paid> = HashMap::new();
    for payment in &snapshot.payments {
        let entry = paid.entry(payment.user_id).or_default();
        entry.total = entry.total.saturating_add(payment.jumlah);
        entry
            .months
            .extend(payment.bulan_dibayar.iter().copied().filter(|m| MONTHS.contains(m)));
    }

    let total_iuran = snapshot.monthly_fee.map(|fee| fee.saturating_mul(12));

    let mut rows: Vec<ChecklistRow> = snapshot
        .members
        .iter()
        .map(|member| {
            let (total_dibayar, bulan_lunas) = match paid.get(&member.user_id) {
                Some(p) => (p.total, p.months.iter().copied().collect::<Vec<_>>()),
                None => (0, Vec::new()),
            };
            let bulan_belum_lunas = MONTHS.filter(|m| !bulan_lunas.contains(m)).collect();

            ChecklistRow {
                user_id: member.user_id,
                nama_anggota: member.name.clone(),
                sekolah: member.school.clone(),
                role: member.role,
                periode_tahun: tahun,
                iuran_per_bulan: snapshot.monthly_fee,
                total_dibayar,
                total_iuran,
                sisa_tunggakan: total_iuran.map(|expected| expected.saturating_sub(total_dibayar)),
                bulan_lunas,
                bulan_belum_lunas,
                status_pembayaran: standing(total_iuran, total_dibayar),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.nama_anggota
            .cmp(&b.nama_anggota)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    rows
}

fn standing(expected: Option<i64>, total: i64) -> PaymentStanding {
    match expected {
        Some(expected) if total >= expected => PaymentStanding::Lunas,
        _ if total > 0 => PaymentStanding::Partial,
        _ => PaymentStanding::Belum,
    }
}
