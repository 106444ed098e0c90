use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::Language;

type Table = HashMap<&'static str, &'static str>;

static EN: Lazy<Table> = Lazy::new(|| {
    HashMap::from([
        // farm form
        ("farmRegistration", "Farm Registration"),
        ("editFarm", "Edit Farm"),
        ("deleteFarm", "Delete Farm"),
        ("submitFarmRegistration", "Submit Registration"),
        ("submittingFarm", "Submitting..."),
        ("farmName", "Farm Name"),
        ("farmEmail", "Farm Email"),
        ("farmMobile", "Farm Mobile"),
        ("roofArea", "Roof Area"),
        ("farmLocation", "Farm Location"),
        ("roofPhoto", "Roof Photo"),
        ("housingType", "Housing Type"),
        ("desiredCropTypes", "Desired Crop Types"),
        ("availableBudget", "Available Budget"),
        ("photoSelected", "Photo selected"),
        ("noPhotoSelected", "No photo selected"),
        // validation and errors
        ("farmNameRequired", "Please enter the farm name"),
        ("invalidEmail", "Please enter a valid email address"),
        ("invalidMobileNumber", "Please enter a valid Saudi mobile number"),
        ("roofAreaRequired", "Please enter a roof area greater than zero"),
        ("locationRequired", "Please enter the farm location"),
        ("selectAtLeastOneCrop", "Please select at least one crop type"),
        ("budgetRequired", "Please enter an available budget of zero or more"),
        ("photoTooLarge", "Photo size must be less than 5MB"),
        ("photoUploadError", "The photo could not be uploaded"),
        ("farmRegistrationError", "Something went wrong while saving the farm. Please try again."),
        ("confirmDeleteFarm", "Are you sure you want to delete this farm?"),
        // list view
        ("myFarms", "My Farms"),
        ("noFarmsRegistered", "No farms registered yet"),
        ("created", "Created"),
        ("roofAreaUnit", "m²"),
        ("budgetUnit", "SAR"),
        ("pending", "Pending Review"),
        ("active", "Active"),
        ("inactive", "Inactive"),
        ("owned", "Owned"),
        ("rental", "Rental"),
        // crops
        ("cucumber", "Cucumber"),
        ("tomatoes", "Tomatoes"),
        ("lettuce", "Lettuce"),
        ("strawberries", "Strawberries"),
        ("leafyGreens", "Leafy Greens"),
        // housing
        ("rentalSingles", "Rental (Singles)"),
        ("rentalFamilies", "Rental (Families)"),
        ("ownedProperty", "Owned Property"),
        // support
        ("pleaseCompleteAllFields", "Please complete all fields"),
        ("supportTicketError", "Failed to submit support ticket. Please try again."),
        ("ticketSubmittedSuccessfully", "Ticket submitted successfully"),
        // subscriptions
        ("paused", "Paused"),
        ("cancelled", "Cancelled"),
        ("everyWeek", "Every week"),
        ("everyTwoWeeks", "Every two weeks"),
        ("everyMonth", "Every month"),
    ])
});

static AR: Lazy<Table> = Lazy::new(|| {
    HashMap::from([
        ("farmRegistration", "تسجيل المزرعة"),
        ("editFarm", "تعديل المزرعة"),
        ("deleteFarm", "حذف المزرعة"),
        ("submitFarmRegistration", "إرسال التسجيل"),
        ("submittingFarm", "جارٍ الإرسال..."),
        ("farmName", "اسم المزرعة"),
        ("farmEmail", "البريد الإلكتروني للمزرعة"),
        ("farmMobile", "جوال المزرعة"),
        ("roofArea", "مساحة السطح"),
        ("farmLocation", "موقع المزرعة"),
        ("roofPhoto", "صورة السطح"),
        ("housingType", "نوع السكن"),
        ("desiredCropTypes", "أنواع المحاصيل المرغوبة"),
        ("availableBudget", "الميزانية المتاحة"),
        ("photoSelected", "تم اختيار الصورة"),
        ("noPhotoSelected", "لم يتم اختيار صورة"),
        ("farmNameRequired", "يرجى إدخال اسم المزرعة"),
        ("invalidEmail", "يرجى إدخال بريد إلكتروني صحيح"),
        ("invalidMobileNumber", "يرجى إدخال رقم جوال سعودي صحيح"),
        ("roofAreaRequired", "يرجى إدخال مساحة سطح أكبر من صفر"),
        ("locationRequired", "يرجى إدخال موقع المزرعة"),
        ("selectAtLeastOneCrop", "يرجى اختيار نوع محصول واحد على الأقل"),
        ("budgetRequired", "يرجى إدخال ميزانية متاحة لا تقل عن صفر"),
        ("photoTooLarge", "يجب أن يكون حجم الصورة أقل من ٥ ميجابايت"),
        ("photoUploadError", "تعذر رفع الصورة"),
        ("farmRegistrationError", "حدث خطأ أثناء حفظ المزرعة. يرجى المحاولة مرة أخرى."),
        ("confirmDeleteFarm", "هل أنت متأكد من حذف هذه المزرعة؟"),
        ("myFarms", "مزارعي"),
        ("noFarmsRegistered", "لا توجد مزارع مسجلة بعد"),
        ("created", "تاريخ الإنشاء"),
        ("roofAreaUnit", "م²"),
        ("budgetUnit", "ر.س"),
        ("pending", "قيد المراجعة"),
        ("active", "نشطة"),
        ("inactive", "غير نشطة"),
        ("owned", "ملك"),
        ("rental", "إيجار"),
        ("cucumber", "خيار"),
        ("tomatoes", "طماطم"),
        ("lettuce", "خس"),
        ("strawberries", "فراولة"),
        ("leafyGreens", "ورقيات"),
        ("rentalSingles", "إيجار (عزاب)"),
        ("rentalFamilies", "إيجار (عائلات)"),
        ("ownedProperty", "عقار مملوك"),
        ("pleaseCompleteAllFields", "يرجى تعبئة جميع الحقول"),
        ("supportTicketError", "تعذر إرسال تذكرة الدعم. يرجى المحاولة مرة أخرى."),
        ("ticketSubmittedSuccessfully", "تم إرسال التذكرة بنجاح"),
        ("paused", "موقوفة مؤقتاً"),
        ("cancelled", "ملغاة"),
        ("everyWeek", "كل أسبوع"),
        ("everyTwoWeeks", "كل أسبوعين"),
        ("everyMonth", "كل شهر"),
    ])
});

fn table(language: Language) -> &'static Table {
    match language {
        Language::En => &EN,
        Language::Ar => &AR,
    }
}

pub(super) fn lookup(language: Language, key: &str) -> Option<&'static str> {
    table(language).get(key).copied()
}

#[cfg(test)]
pub(super) fn keys(language: Language) -> Vec<&'static str> {
    table(language).keys().copied().collect()
}
