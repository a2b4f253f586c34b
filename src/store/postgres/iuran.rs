use async_trait::async_trait;
use sqlx::query_as;
use uuid::Uuid;

use super::PgStore;
use crate::models::iuran::{
    ChecklistMember, ChecklistPayment, ChecklistSnapshot, ConfigStatus, DeleteState, DeleteStatus,
    IuranConfig, IuranConfigPatch, NewIuranConfig, NewPembayaran, PembayaranIuran, PembayaranPatch,
};
use crate::store::{IuranStore, StoreError, StoreResult};

const CONFIG_COLUMNS: &str = "id, periode_tahun, nominal, status, created_at, updated_at";

const PAYMENT_VIEW: &str = "p.*, u.name AS user_name, r.name AS recorded_by_name,
    dr.name AS delete_requested_by_name, da.name AS delete_approved_by_name";
const PAYMENT_JOINS: &str = "LEFT JOIN users u ON p.user_id = u.id
     LEFT JOIN users r ON p.recorded_by = r.id
     LEFT JOIN users dr ON p.delete_requested_by = dr.id
     LEFT JOIN users da ON p.delete_approved_by = da.id";

impl PgStore {
    // Satu statement yang mengubah baris pembayaran lalu mengembalikan tampilan lengkapnya.
    fn payment_mutation(update: &str) -> String {
        format!("WITH p AS ({update} RETURNING *) SELECT {PAYMENT_VIEW} FROM p {PAYMENT_JOINS}")
    }
}

#[async_trait]
impl IuranStore for PgStore {
    async fn list_configs(
        &self,
        tahun: Option<i32>,
        status: Option<ConfigStatus>,
    ) -> StoreResult<Vec<IuranConfig>> {
        let sql = format!(
            "SELECT {CONFIG_COLUMNS} FROM iuran_config
             WHERE deleted_at IS NULL
               AND ($1::INT IS NULL OR periode_tahun = $1)
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY periode_tahun DESC"
        );
        let rows = query_as::<_, IuranConfig>(&sql)
            .bind(tahun)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_config(&self, id: Uuid) -> StoreResult<Option<IuranConfig>> {
        let sql = format!("SELECT {CONFIG_COLUMNS} FROM iuran_config WHERE id = $1 AND deleted_at IS NULL");
        Ok(query_as::<_, IuranConfig>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn upsert_config(&self, config: &NewIuranConfig) -> StoreResult<IuranConfig> {
        let sql = format!(
            "INSERT INTO iuran_config (periode_tahun, nominal, status)
             VALUES ($1, $2, $3)
             ON CONFLICT (periode_tahun) DO UPDATE SET
                nominal = EXCLUDED.nominal,
                status = EXCLUDED.status,
                deleted_at = NULL,
                updated_at = NOW()
             RETURNING {CONFIG_COLUMNS}"
        );
        let row = query_as::<_, IuranConfig>(&sql)
            .bind(config.periode_tahun)
            .bind(config.nominal)
            .bind(config.status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_config(&self, id: Uuid, patch: &IuranConfigPatch) -> StoreResult<Option<IuranConfig>> {
        let sql = format!(
            "UPDATE iuran_config SET
                periode_tahun = COALESCE($2, periode_tahun),
                nominal = COALESCE($3, nominal),
                status = COALESCE($4, status),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {CONFIG_COLUMNS}"
        );
        let row = query_as::<_, IuranConfig>(&sql)
            .bind(id)
            .bind(patch.periode_tahun)
            .bind(patch.nominal)
            .bind(patch.status.map(|s| s.as_str()))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn soft_delete_config(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE iuran_config SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_payments(
        &self,
        tahun: Option<i32>,
        user_id: Option<Uuid>,
    ) -> StoreResult<Vec<PembayaranIuran>> {
        let sql = format!(
            "SELECT {PAYMENT_VIEW} FROM pembayaran_iuran p {PAYMENT_JOINS}
             WHERE p.deleted_at IS NULL
               AND ($1::INT IS NULL OR p.periode_tahun = $1)
               AND ($2::UUID IS NULL OR p.user_id = $2)
             ORDER BY p.tanggal_bayar DESC, p.created_at DESC"
        );
        let rows = query_as::<_, PembayaranIuran>(&sql)
            .bind(tahun)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_payment(&self, id: Uuid) -> StoreResult<Option<PembayaranIuran>> {
        let sql = format!(
            "SELECT {PAYMENT_VIEW} FROM pembayaran_iuran p {PAYMENT_JOINS}
             WHERE p.id = $1 AND p.deleted_at IS NULL"
        );
        Ok(query_as::<_, PembayaranIuran>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn insert_payment(&self, payment: &NewPembayaran) -> StoreResult<PembayaranIuran> {
        let sql = Self::payment_mutation(
            "INSERT INTO pembayaran_iuran
                (user_id, periode_tahun, bulan_dibayar, jumlah, metode_bayar, tanggal_bayar, recorded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        );
        let row = query_as::<_, PembayaranIuran>(&sql)
            .bind(payment.user_id)
            .bind(payment.periode_tahun)
            .bind(&payment.bulan_dibayar)
            .bind(payment.jumlah)
            .bind(&payment.metode_bayar)
            .bind(payment.tanggal_bayar)
            .bind(payment.recorded_by)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_active_payment(
        &self,
        id: Uuid,
        patch: &PembayaranPatch,
    ) -> StoreResult<Option<PembayaranIuran>> {
        let sql = Self::payment_mutation(
            "UPDATE pembayaran_iuran SET
                user_id = COALESCE($2, user_id),
                periode_tahun = COALESCE($3, periode_tahun),
                bulan_dibayar = COALESCE($4, bulan_dibayar),
                jumlah = COALESCE($5, jumlah),
                metode_bayar = COALESCE($6, metode_bayar),
                tanggal_bayar = COALESCE($7, tanggal_bayar)
             WHERE id = $1 AND deleted_at IS NULL AND delete_status = 'active'",
        );
        let row = query_as::<_, PembayaranIuran>(&sql)
            .bind(id)
            .bind(patch.user_id)
            .bind(patch.periode_tahun)
            .bind(&patch.bulan_dibayar)
            .bind(patch.jumlah)
            .bind(&patch.metode_bayar)
            .bind(patch.tanggal_bayar)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn request_payment_delete(
        &self,
        id: Uuid,
        requested_by: Uuid,
    ) -> StoreResult<Option<PembayaranIuran>> {
        let sql = Self::payment_mutation(
            "UPDATE pembayaran_iuran SET
                delete_status = 'requested',
                delete_requested_by = $2,
                delete_requested_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL AND delete_status = 'active'",
        );
        let row = query_as::<_, PembayaranIuran>(&sql)
            .bind(id)
            .bind(requested_by)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn approve_payment_delete(
        &self,
        id: Uuid,
        approved_by: Uuid,
    ) -> StoreResult<Option<PembayaranIuran>> {
        let sql = Self::payment_mutation(
            "UPDATE pembayaran_iuran SET
                delete_status = 'approved',
                delete_approved_by = $2,
                delete_approved_at = NOW(),
                deleted_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL AND delete_status = 'requested'",
        );
        let row = query_as::<_, PembayaranIuran>(&sql)
            .bind(id)
            .bind(approved_by)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn payment_delete_state(&self, id: Uuid) -> StoreResult<Option<DeleteState>> {
        let row: Option<(String, bool)> = query_as(
            "SELECT delete_status, deleted_at IS NOT NULL FROM pembayaran_iuran WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            None => Ok(None),
            Some((status, deleted)) => {
                let status: DeleteStatus = status.parse().map_err(|e: crate::models::UnknownVariant| {
                    StoreError::Database(sqlx::Error::Decode(Box::new(e)))
                })?;
                Ok(Some(DeleteState { status, deleted }))
            }
        }
    }

    async fn checklist_snapshot(&self, tahun: i32) -> StoreResult<ChecklistSnapshot> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let members = query_as::<_, ChecklistMember>(
            "SELECT id AS user_id, name, school, role FROM users
             WHERE is_active = TRUE AND deleted_at IS NULL
             ORDER BY name ASC",
        )
        .fetch_all(&mut *tx)
        .await?;

        let fee: Option<(i64,)> = query_as(
            "SELECT nominal FROM iuran_config
             WHERE periode_tahun = $1 AND status = 'aktif' AND deleted_at IS NULL",
        )
        .bind(tahun)
        .fetch_optional(&mut *tx)
        .await?;

        let payments = query_as::<_, ChecklistPayment>(
            "SELECT user_id, bulan_dibayar, jumlah FROM pembayaran_iuran
             WHERE periode_tahun = $1 AND deleted_at IS NULL",
        )
        .bind(tahun)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ChecklistSnapshot {
            members,
            monthly_fee: fee.map(|(nominal,)| nominal),
            payments,
        })
    }
}
