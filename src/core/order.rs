use crate::app::forms::UserOrderForm;
use crate::domain::model::{
    Customer, CustomerOptionService, CustomerPackage, OrderRecord, PriceBreakdown,
};
use crate::domain::ports::OrderSink;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use uuid::Uuid;

/// 由已驗證的申請表單與接受的報價組成訂單
pub fn build_order(form: &UserOrderForm, price: PriceBreakdown) -> Result<OrderRecord> {
    form.validate()?;
    let request = form.to_move_request()?;
    let customer_id = Uuid::new_v4().to_string();

    let customer = Customer {
        customer_id: customer_id.clone(),
        customer_name: form.customer_name.trim().to_string(),
        tel: form.tel.trim().to_string(),
        email: form.email.trim().to_string(),
        old_prefecture_id: request.origin.id().to_string(),
        old_address: form.old_address.trim().to_string(),
        new_prefecture_id: request.destination.id().to_string(),
        new_address: form.new_address.trim().to_string(),
        moving_date: request.moving_date,
    };

    let option_services = request
        .requested_services()
        .into_iter()
        .map(|service| CustomerOptionService {
            customer_id: customer_id.clone(),
            service_id: service.code(),
        })
        .collect();

    let packages = request
        .items
        .non_zero()
        .map(|(category, count)| CustomerPackage {
            customer_id: customer_id.clone(),
            package_id: category.code(),
            package_number: count,
        })
        .collect();

    Ok(OrderRecord {
        customer,
        option_services,
        packages,
        price,
    })
}

pub struct OrderRegistration<S: OrderSink> {
    sink: S,
}

impl<S: OrderSink> OrderRegistration<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub async fn register(
        &self,
        form: &UserOrderForm,
        price: PriceBreakdown,
    ) -> Result<OrderRecord> {
        let order = build_order(form, price)?;
        let location = self.sink.register(&order).await?;
        tracing::info!(
            "📝 Registered order {} ({} packages, {} options) at {}",
            order.customer.customer_id,
            order.packages.len(),
            order.option_services.len(),
            location
        );
        Ok(order)
    }
}
